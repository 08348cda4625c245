use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

/// Errors that abort a comparison
///
/// No partial result is ever returned alongside one of these.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("revision '{spec}' not found")]
    RevisionNotFound { spec: String },

    #[error("failed to enrich commit {commit}: {cause:#}")]
    EnrichmentFailure {
        commit: ObjectId,
        cause: anyhow::Error,
    },

    #[error("repository unavailable: {0:#}")]
    RepositoryUnavailable(anyhow::Error),

    #[error("comparison cancelled")]
    Cancelled,
}

impl CompareError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CompareError::RevisionNotFound { .. })
    }
}
