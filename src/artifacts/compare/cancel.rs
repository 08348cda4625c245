use crate::artifacts::compare::error::CompareError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between a caller and a running comparison
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with `Cancelled` once the signal has fired
    pub fn check(&self) -> Result<(), CompareError> {
        if self.is_cancelled() {
            Err(CompareError::Cancelled)
        } else {
            Ok(())
        }
    }
}
