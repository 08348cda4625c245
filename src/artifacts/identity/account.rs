use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Account an author identity resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub login: String,
    pub full_name: String,
    pub email: String,
}

/// Identity-lookup collaborator
///
/// Implementations must be pure per identity: looking the same string up
/// twice yields the same answer.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Resolve a raw `Name <email>` identity (or a bare email or name)
    async fn lookup_account(&self, identity: &str) -> anyhow::Result<Option<Account>>;
}

/// Directory backed by a fixed list of accounts, typically loaded from configuration
///
/// Matches on email first (case-insensitive), then on login or full name.
#[derive(Debug, Clone, Default)]
pub struct StaticAccountDirectory {
    accounts: Vec<Account>,
}

impl StaticAccountDirectory {
    pub fn new(accounts: Vec<Account>) -> Self {
        StaticAccountDirectory { accounts }
    }

    fn split_identity(identity: &str) -> (&str, Option<&str>) {
        match (identity.find('<'), identity.rfind('>')) {
            (Some(start), Some(end)) if start < end => {
                (identity[..start].trim(), Some(identity[start + 1..end].trim()))
            }
            _ if identity.contains('@') => ("", Some(identity.trim())),
            _ => (identity.trim(), None),
        }
    }

    fn find(&self, identity: &str) -> Option<&Account> {
        let (name, email) = Self::split_identity(identity);

        email
            .and_then(|email| {
                self.accounts
                    .iter()
                    .find(|account| account.email.eq_ignore_ascii_case(email))
            })
            .or_else(|| {
                (!name.is_empty()).then_some(()).and_then(|_| {
                    self.accounts
                        .iter()
                        .find(|account| account.login == name || account.full_name == name)
                })
            })
    }
}

#[async_trait]
impl AccountDirectory for StaticAccountDirectory {
    async fn lookup_account(&self, identity: &str) -> anyhow::Result<Option<Account>> {
        Ok(self.find(identity).cloned())
    }
}
