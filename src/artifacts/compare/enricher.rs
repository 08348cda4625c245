use crate::artifacts::compare::error::CompareError;
use crate::artifacts::compare::handle::RepositoryHandle;
use crate::artifacts::compare::result::{EnrichedCommit, Signer, VerificationResult};
use crate::artifacts::identity::identity_cache::IdentityCache;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::signature::SignatureCheck;

/// What to compute for each commit beyond its author account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichOptions {
    pub compute_stats: bool,
    pub compute_files: bool,
    pub verify_signature: bool,
}

impl EnrichOptions {
    fn needs_diff(&self) -> bool {
        self.compute_stats || self.compute_files
    }
}

/// Computes per-commit statistics, changed paths and signature status
///
/// Commits are independent of each other, so `enrich` may run for several of
/// them at once. Author and signer identities go through the shared cache.
pub struct CommitEnricher<'a, R: RepositoryHandle + ?Sized> {
    repository: &'a R,
    identities: &'a IdentityCache,
    options: EnrichOptions,
}

impl<'a, R: RepositoryHandle + ?Sized> CommitEnricher<'a, R> {
    pub fn new(repository: &'a R, identities: &'a IdentityCache, options: EnrichOptions) -> Self {
        CommitEnricher {
            repository,
            identities,
            options,
        }
    }

    pub async fn enrich(&self, commit: Commit) -> Result<EnrichedCommit, CompareError> {
        let failure = |cause: anyhow::Error| CompareError::EnrichmentFailure {
            commit: commit.oid().clone(),
            cause,
        };

        let author_account = self
            .identities
            .resolve(&commit.author().display_name())
            .await
            .map_err(failure)?;

        let mut enriched = EnrichedCommit::new(commit.clone());
        enriched.author_account = author_account;

        if self.options.needs_diff() {
            // root commits are compared against the empty tree
            let changes = self
                .repository
                .diff_trees(commit.parent(), commit.oid(), self.options.compute_stats)
                .map_err(failure)?;

            if self.options.compute_stats {
                let stat = changes.stat.unwrap_or_default();
                enriched.insertions = Some(stat.insertions);
                enriched.deletions = Some(stat.deletions);
            }
            if self.options.compute_files {
                enriched.files_changed = Some(changes.paths);
            }
        }

        if self.options.verify_signature {
            let check = self
                .repository
                .verify_signature(commit.oid())
                .map_err(failure)?;
            enriched.verification = Some(self.classify(&commit, check).await.map_err(failure)?);
        }

        Ok(enriched)
    }

    async fn classify(
        &self,
        commit: &Commit,
        check: SignatureCheck,
    ) -> anyhow::Result<VerificationResult> {
        let committer = commit.committer();

        Ok(match check {
            SignatureCheck::Missing => VerificationResult::NotSigned,
            SignatureCheck::Bad { reason } => VerificationResult::Unverified { reason },
            SignatureCheck::Good { principal, .. }
                if !principal.eq_ignore_ascii_case(committer.email()) =>
            {
                VerificationResult::Unverified {
                    reason: format!(
                        "signed by {principal}, which does not match committer {}",
                        committer.email()
                    ),
                }
            }
            SignatureCheck::Good {
                principal,
                fingerprint,
            } => {
                let account = self.identities.resolve(&committer.display_name()).await?;
                VerificationResult::Verified {
                    signer: Signer {
                        principal,
                        fingerprint,
                        account,
                    },
                }
            }
        })
    }
}
