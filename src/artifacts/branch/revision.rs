use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;

/// Minimum length of an abbreviated object ID
const MIN_OID_PREFIX_LENGTH: usize = 4;

/// Represents a revision specification that can be used to identify commits.
///
/// Supports multiple formats:
/// - Branch/tag/ref names: `main`, `feature/login`, `v1.0`, `origin/main`, `HEAD`
/// - Aliases: `@` (resolves to `HEAD`)
/// - Full OIDs: 40-character hexadecimal strings (resolved as fallback if ref doesn't exist)
/// - Abbreviated OIDs: 4-40 character hexadecimal strings (resolved as fallback if ref doesn't exist)
/// - Parent notation: `<revision>^` (e.g., `main^`, `HEAD^`, `abc123^`)
/// - Ancestor notation: `<revision>~<n>` (e.g., `main~3`, `HEAD~5`, `abc123~2`)
///
/// # Parsing Strategy
///
/// OID-like strings (e.g., "abc123") are initially parsed as `Ref` variants. During resolution,
/// if no ref with that name exists and the string looks like an OID, the resolver will attempt
/// to resolve it as an object ID. Refs win over OIDs when both match.
///
/// # Resolution outcome
///
/// Unknown names, ambiguous prefixes, names pointing at non-commits and walking past a root
/// commit all resolve to `Ok(None)`. Only failures to read the repository are errors.
#[derive(Debug, Clone)]
pub enum Revision {
    /// A reference to a branch, tag, symbolic ref, or potentially an OID
    Ref(BranchName),
    /// The Nth first-parent ancestor of a revision (e.g., HEAD~3)
    Ancestor(Box<Revision>, usize),
    /// The first parent of a revision (e.g., HEAD^)
    Parent(Box<Revision>),
}

impl Revision {
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        match self {
            Revision::Ref(branch_name) => {
                if let Some(oid) = repository.refs().read_ref(branch_name)? {
                    return repository.database().peel_to_commit(&oid);
                }

                let name = branch_name.as_ref();
                if Self::looks_like_oid(name) {
                    Self::resolve_oid(name, repository)
                } else {
                    tracing::debug!(revision = name, "no ref matches revision");
                    Ok(None)
                }
            }
            Revision::Parent(base_revision) => {
                Self::resolve_commit_parent(base_revision.resolve(repository)?, repository)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::resolve_commit_parent(oid, repository)?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_commit_parent(
        oid: Option<ObjectId>,
        repository: &Repository,
    ) -> anyhow::Result<Option<ObjectId>> {
        match oid {
            Some(oid) => Ok(repository
                .database()
                .parse_object_as_commit(&oid)?
                .and_then(|commit| commit.parent().cloned())),
            None => Ok(None),
        }
    }

    fn resolve_oid(oid_str: &str, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        let database = repository.database();

        if oid_str.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(oid_str.to_string())?;
            if !database.contains(&oid) {
                return Ok(None);
            }
            return database.peel_to_commit(&oid);
        }

        let mut commit_matches = Vec::new();
        for oid in database.find_objects_by_prefix(oid_str)? {
            if let Some(commit_oid) = database.peel_to_commit(&oid)?
                && !commit_matches.contains(&commit_oid)
            {
                commit_matches.push(commit_oid);
            }
        }

        match commit_matches.len() {
            1 => Ok(commit_matches.pop()),
            0 => {
                tracing::debug!(prefix = oid_str, "no commit matches abbreviated id");
                Ok(None)
            }
            candidates => {
                tracing::debug!(prefix = oid_str, candidates, "abbreviated id is ambiguous");
                Ok(None)
            }
        }
    }

    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent_regex = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        let ancestor_regex = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;

        if let Some(caps) = parent_regex.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ancestor_regex.captures(revision) {
            let generations: usize = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else {
            let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            let branch_name = BranchName::try_parse(resolved_name.to_string())?;
            Ok(Revision::Ref(branch_name))
        }
    }

    fn looks_like_oid(s: &str) -> bool {
        s.len() >= MIN_OID_PREFIX_LENGTH
            && s.len() <= OBJECT_ID_LENGTH
            && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}
