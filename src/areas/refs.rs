//! Git references (branches, HEAD, tags, remotes)
//!
//! References are human-readable names pointing to objects. They can be:
//! - Direct: a file containing a 40-character SHA-1
//! - Symbolic: `ref: <path>`, pointing to another reference (HEAD -> refs/heads/main)
//! - Packed: a line `<oid> <path>` in `.git/packed-refs`, used once a loose
//!   file is absent
//!
//! ## Lookup order
//!
//! A short name is tried as `<name>`, `refs/<name>`, `refs/tags/<name>`,
//! `refs/heads/<name>`, `refs/remotes/<name>` and `refs/remotes/<name>/HEAD`,
//! the first match winning. The name itself is only tried when it is a full
//! `refs/...` path or looks like `HEAD` (upper case and underscores) so that
//! files such as `.git/config` are never read as refs.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::collections::HashMap;
use std::path::Path;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

const PACKED_REFS_FILE: &str = "packed-refs";

/// Upper bound on `ref:` indirections followed before giving up
const MAX_SYMREF_DEPTH: usize = 5;

const REF_CANDIDATES: [&str; 5] = [
    "refs/{}",
    "refs/tags/{}",
    "refs/heads/{}",
    "refs/remotes/{}",
    "refs/remotes/{}/HEAD",
];

/// Read-only view of `.git/HEAD`, `.git/refs` and `.git/packed-refs`
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

/// Content of a loose ref file
#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef { sym_ref_name: SymRefName },
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {}", path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            let oid = ObjectId::try_parse(content.to_string())
                .with_context(|| format!("invalid ref file at {}", path.display()))?;
            Ok(Some(SymRefOrOid::Oid(oid)))
        }
    }
}

impl Refs {
    /// Get the current symbolic reference
    ///
    /// Follows symbolic references to the final direct reference. If HEAD
    /// points to refs/heads/main, returns refs/heads/main; a detached HEAD
    /// returns HEAD itself.
    pub fn current_ref(&self, source: Option<SymRefName>) -> anyhow::Result<SymRefName> {
        let mut current = source.unwrap_or_else(|| SymRefName::new(HEAD_REF_NAME.to_string()));

        for _ in 0..MAX_SYMREF_DEPTH {
            let ref_content =
                SymRefOrOid::read_symref_or_oid(&self.path.join(current.as_ref_path()))?;

            match ref_content {
                Some(SymRefOrOid::SymRef { sym_ref_name }) => current = sym_ref_name,
                Some(SymRefOrOid::Oid(_)) | None => return Ok(current),
            }
        }

        anyhow::bail!("too many levels of symbolic refs at {}", current.as_ref_path())
    }

    /// The branch HEAD points at, if it is not detached
    pub fn default_branch(&self) -> anyhow::Result<Option<BranchName>> {
        Ok(self.current_ref(None)?.branch_name())
    }

    /// Resolve a short or full reference name to the object it points at
    ///
    /// # Returns
    ///
    /// `None` when no candidate path names a reference. The object is not
    /// peeled: an annotated tag resolves to the tag object.
    pub fn read_ref(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        for candidate in self.candidates(name.as_ref()) {
            if let Some(oid) = self.read_ref_path(&candidate)? {
                tracing::trace!(name = name.as_ref(), candidate, %oid, "resolved ref");
                return Ok(Some(oid));
            }
        }

        Ok(None)
    }

    fn candidates(&self, name: &str) -> Vec<String> {
        let top_level = (name.starts_with("refs/")
            || name.chars().all(|ch| ch.is_ascii_uppercase() || ch == '_'))
        .then(|| name.to_string());

        top_level
            .into_iter()
            .chain(
                REF_CANDIDATES
                    .iter()
                    .map(|pattern| pattern.replace("{}", name)),
            )
            .collect()
    }

    /// Read a ref by its path under the git directory, loose file first
    fn read_ref_path(&self, ref_path: &str) -> anyhow::Result<Option<ObjectId>> {
        let mut current = ref_path.to_string();

        for _ in 0..MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&self.path.join(&current))? {
                Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                    current = sym_ref_name.as_ref_path().to_string();
                }
                Some(SymRefOrOid::Oid(oid)) => return Ok(Some(oid)),
                None => return Ok(self.packed_refs()?.remove(&current)),
            }
        }

        anyhow::bail!("too many levels of symbolic refs at {ref_path}")
    }

    /// Entries of `.git/packed-refs` keyed by full ref path
    ///
    /// Peeled lines (`^<oid>`) are skipped; tags are peeled through the
    /// object database instead.
    pub fn packed_refs(&self) -> anyhow::Result<HashMap<String, ObjectId>> {
        let path = self.path.join(PACKED_REFS_FILE);
        if !path.is_file() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('^'))
            .map(|line| -> anyhow::Result<(String, ObjectId)> {
                let (oid, name) = line
                    .split_once(' ')
                    .with_context(|| format!("malformed packed ref line: {line}"))?;
                Ok((name.to_string(), ObjectId::try_parse(oid.to_string())?))
            })
            .collect()
    }
}
