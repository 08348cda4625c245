use crate::artifacts::compare::cancel::CancellationSignal;
use crate::artifacts::compare::enricher::{CommitEnricher, EnrichOptions};
use crate::artifacts::compare::error::CompareError;
use crate::artifacts::compare::handle::RepositoryHandle;
use crate::artifacts::compare::refspec::RefSpec;
use crate::artifacts::compare::result::{
    CompareResult, ComparisonMode, EnrichedCommit, MergeBase, ResolvedRevision,
};
use crate::artifacts::identity::account::AccountDirectory;
use crate::artifacts::identity::identity_cache::IdentityCache;
use crate::artifacts::log::commit_graph::CommitGraph;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use futures::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;

/// Commits enriched concurrently when nothing else is configured
pub const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct CompareRequest {
    /// `base...head`, `base..head`, a single revision, or empty
    pub basehead: String,
    /// Stands in for an omitted side
    pub default_revision: String,
    #[new(default)]
    pub include_commits: bool,
    #[new(default)]
    pub options: EnrichOptions,
}

impl CompareRequest {
    /// Ask for the enriched commit list, computing what `options` selects
    pub fn with_commits(mut self, options: EnrichOptions) -> Self {
        self.include_commits = true;
        self.options = options;
        self
    }
}

/// Everything decided before enrichment starts
struct Plan {
    refspec: RefSpec,
    base: ObjectId,
    head: ObjectId,
    merge_base: Option<MergeBase>,
    commits: Vec<Commit>,
}

/// Runs comparisons against one repository
///
/// Each call to `compare` is independent: it gets its own commit graph and
/// identity cache, so concurrent comparisons do not interfere.
pub struct Comparer<'r, R: RepositoryHandle + ?Sized> {
    repository: &'r R,
    directory: Arc<dyn AccountDirectory>,
    workers: usize,
    cancel: CancellationSignal,
}

impl<'r, R: RepositoryHandle + ?Sized> Comparer<'r, R> {
    pub fn new(repository: &'r R, directory: Arc<dyn AccountDirectory>) -> Self {
        Comparer {
            repository,
            directory,
            workers: DEFAULT_WORKERS,
            cancel: CancellationSignal::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn compare(&self, request: &CompareRequest) -> Result<CompareResult, CompareError> {
        let refspec = RefSpec::parse(&request.basehead, &request.default_revision);
        tracing::debug!(
            mode = ?refspec.mode,
            base = %refspec.base,
            head = %refspec.head,
            "comparing revisions"
        );

        let Plan {
            refspec,
            base,
            head,
            merge_base,
            commits,
        } = self.plan(refspec)?;

        let identities = IdentityCache::new(self.directory.clone());
        let enriched = if request.include_commits {
            Some(self.enrich(&commits, &identities, request.options).await?)
        } else {
            None
        };

        tracing::debug!(
            commits = commits.len(),
            identity_lookups = identities.lookups(),
            "comparison finished"
        );

        Ok(CompareResult::new(
            refspec.mode,
            ResolvedRevision {
                spec: refspec.base,
                oid: base,
            },
            ResolvedRevision {
                spec: refspec.head,
                oid: head,
            },
            merge_base,
            commits,
            enriched,
            identities,
        ))
    }

    /// Resolve both sides, find the boundary and enumerate the range
    fn plan(&self, refspec: RefSpec) -> Result<Plan, CompareError> {
        self.cancel.check()?;
        let base = self.resolve(&refspec.base)?;
        let head = self.resolve(&refspec.head)?;

        let graph = CommitGraph::new(self.repository, &self.cancel);
        let load = |oid: &ObjectId| graph.slim_commit(oid);

        let (merge_base, boundary) = match refspec.mode {
            ComparisonMode::DirectDiff => (None, vec![base.clone()]),
            ComparisonMode::AncestryRange => {
                let merge_bases = BCAFinder::new(load).merge_bases(&base, &head)?;
                tracing::debug!(merge_bases = merge_bases.len(), "computed merge base");
                if merge_bases.is_empty() {
                    tracing::debug!(%base, %head, "unrelated histories");
                }

                (Some(MergeBase::new(merge_bases.clone())), merge_bases)
            }
        };

        self.cancel.check()?;
        let range = RevList::new(load).enumerate(&head, &boundary)?;
        let commits = range
            .iter()
            .map(|oid| graph.commit(oid))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            commits = commits.len(),
            loaded = graph.len(),
            "enumerated commit range"
        );

        Ok(Plan {
            refspec,
            base,
            head,
            merge_base,
            commits,
        })
    }

    fn resolve(&self, spec: &str) -> Result<ObjectId, CompareError> {
        self.repository
            .resolve_revision(spec)
            .map_err(CompareError::RepositoryUnavailable)?
            .ok_or_else(|| CompareError::RevisionNotFound {
                spec: spec.to_string(),
            })
    }

    /// Enrich every commit with at most `workers` in flight, keeping range order
    async fn enrich(
        &self,
        commits: &[Commit],
        identities: &IdentityCache,
        options: EnrichOptions,
    ) -> Result<Vec<EnrichedCommit>, CompareError> {
        let enricher = CommitEnricher::new(self.repository, identities, options);

        stream::iter(commits.iter().cloned())
            .map(|commit| {
                let enricher = &enricher;
                async move {
                    self.cancel.check()?;
                    enricher.enrich(commit).await
                }
            })
            .buffered(self.workers)
            .try_collect()
            .await
    }
}
