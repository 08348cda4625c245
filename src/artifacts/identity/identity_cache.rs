//! Request-scoped author identity cache
//!
//! Every distinct identity string is looked up at most once per cache, even
//! when several enrichment tasks ask for it at the same time: each key owns a
//! `OnceCell` and the first caller to reach it performs the lookup while the
//! others await the same cell.

use crate::artifacts::identity::account::{Account, AccountDirectory};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, OnceCell};

type Slot = Arc<OnceCell<Option<Account>>>;

pub struct IdentityCache {
    directory: Arc<dyn AccountDirectory>,
    slots: Mutex<HashMap<String, Slot>>,
    lookups: AtomicUsize,
}

impl IdentityCache {
    pub fn new(directory: Arc<dyn AccountDirectory>) -> Self {
        IdentityCache {
            directory,
            slots: Mutex::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Resolve an identity, consulting the directory only on first use
    ///
    /// A failed lookup leaves the slot empty so the next caller retries.
    pub async fn resolve(&self, identity: &str) -> anyhow::Result<Option<Account>> {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(identity.to_string()).or_default().clone()
        };

        let account = slot
            .get_or_try_init(|| async {
                self.lookups.fetch_add(1, Ordering::SeqCst);
                tracing::trace!(identity, "looking up account");
                self.directory.lookup_account(identity).await
            })
            .await?;

        Ok(account.clone())
    }

    /// Number of directory lookups performed so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("lookups", &self.lookups())
            .finish_non_exhaustive()
    }
}
