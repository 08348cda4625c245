//! Aggregate output of a comparison
//!
//! A `CompareResult` is built once per request and never mutated afterwards.
//! It owns the identity cache that served the request but holds no handle to
//! the repository.

use crate::artifacts::identity::account::Account;
use crate::artifacts::identity::identity_cache::IdentityCache;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// `base..head` or a single revision: the two points are compared literally
    DirectDiff,
    /// `base...head`: head is compared against the merge base of both sides
    AncestryRange,
}

/// Lowest common ancestors of the two sides; empty for unrelated histories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergeBase(Vec<ObjectId>);

impl MergeBase {
    pub fn new(oids: Vec<ObjectId>) -> Self {
        MergeBase(oids)
    }

    pub fn oids(&self) -> &[ObjectId] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One side of the comparison: what was asked for and what it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRevision {
    pub spec: String,
    pub oid: ObjectId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signer {
    pub principal: String,
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationResult {
    Verified { signer: Signer },
    Unverified { reason: String },
    NotSigned,
}

/// A commit with the data computed for it
///
/// `None` fields were not asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedCommit {
    #[serde(flatten)]
    pub commit: Commit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insertions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_changed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_account: Option<Account>,
}

impl EnrichedCommit {
    pub fn new(commit: Commit) -> Self {
        EnrichedCommit {
            commit,
            insertions: None,
            deletions: None,
            files_changed: None,
            verification: None,
            author_account: None,
        }
    }
}

#[derive(Debug)]
pub struct CompareResult {
    mode: ComparisonMode,
    base: ResolvedRevision,
    head: ResolvedRevision,
    merge_base: Option<MergeBase>,
    commits: Vec<Commit>,
    enriched: Option<Vec<EnrichedCommit>>,
    identities: IdentityCache,
}

impl CompareResult {
    pub(crate) fn new(
        mode: ComparisonMode,
        base: ResolvedRevision,
        head: ResolvedRevision,
        merge_base: Option<MergeBase>,
        commits: Vec<Commit>,
        enriched: Option<Vec<EnrichedCommit>>,
        identities: IdentityCache,
    ) -> Self {
        CompareResult {
            mode,
            base,
            head,
            merge_base,
            commits,
            enriched,
            identities,
        }
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    pub fn base(&self) -> &ResolvedRevision {
        &self.base
    }

    pub fn head(&self) -> &ResolvedRevision {
        &self.head
    }

    /// `None` for direct comparisons, where no merge base is computed
    pub fn merge_base(&self) -> Option<&MergeBase> {
        self.merge_base.as_ref()
    }

    /// Commits unique to head, newest first
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn enriched(&self) -> Option<&[EnrichedCommit]> {
        self.enriched.as_deref()
    }

    pub fn identities(&self) -> &IdentityCache {
        &self.identities
    }

    pub fn total_commits(&self) -> usize {
        self.commits.len()
    }

    /// The two sides share no history
    pub fn unrelated_histories(&self) -> bool {
        self.merge_base.as_ref().is_some_and(MergeBase::is_empty)
    }

    /// Serializable view: the count, the unrelated flag and the commit list when enriched
    pub fn to_response(&self) -> CompareResponse<'_> {
        CompareResponse {
            total_commits: self.total_commits(),
            unrelated_histories: self.unrelated_histories(),
            commits: self.enriched(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompareResponse<'a> {
    pub total_commits: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unrelated_histories: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commits: Option<&'a [EnrichedCommit]>,
}
