//! Read-only view of a repository used by the comparison engine
//!
//! `Repository` implements it against `.git` on disk; tests implement it in
//! memory.

use crate::artifacts::diff::diff_stat::DiffStat;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::signature::SignatureCheck;

/// Result of comparing two commit snapshots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeChanges {
    /// Changed file paths in lexicographic order
    pub paths: Vec<String>,
    /// Line counts, when they were asked for
    pub stat: Option<DiffStat>,
}

pub trait RepositoryHandle: Send + Sync {
    /// Resolve a revision expression to a commit
    ///
    /// `Ok(None)` when the expression names nothing, is malformed, is an
    /// ambiguous abbreviation, or does not lead to a commit.
    fn resolve_revision(&self, spec: &str) -> anyhow::Result<Option<ObjectId>>;

    fn commit(&self, oid: &ObjectId) -> anyhow::Result<Commit>;

    /// Compare the snapshots of two commits; `old` of `None` is the empty tree
    fn diff_trees(
        &self,
        old: Option<&ObjectId>,
        new: &ObjectId,
        with_stat: bool,
    ) -> anyhow::Result<TreeChanges>;

    fn changed_paths(&self, old: Option<&ObjectId>, new: &ObjectId) -> anyhow::Result<Vec<String>> {
        Ok(self.diff_trees(old, new, false)?.paths)
    }

    fn diff_stat(&self, old: Option<&ObjectId>, new: &ObjectId) -> anyhow::Result<DiffStat> {
        Ok(self.diff_trees(old, new, true)?.stat.unwrap_or_default())
    }

    /// Check the signature embedded in a commit
    fn verify_signature(&self, oid: &ObjectId) -> anyhow::Result<SignatureCheck>;
}
