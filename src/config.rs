//! Comparison settings
//!
//! Read from a TOML file, `--config <path>` or `.git/compare.toml` by
//! default. Every field is optional; command-line flags take precedence.
//!
//! ```toml
//! default_branch = "main"
//! workers = 8
//! allowed_signers = ".git/allowed_signers"
//!
//! [[accounts]]
//! id = 1
//! login = "octo"
//! full_name = "Octo Cat"
//! email = "octo@example.com"
//! ```

use crate::artifacts::compare::engine::DEFAULT_WORKERS;
use crate::artifacts::identity::account::Account;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File looked up inside the git directory when no path is given
pub const CONFIG_FILE_NAME: &str = "compare.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub workers: Option<usize>,
    /// Relative paths are taken from the repository root
    #[serde(default)]
    pub allowed_signers: Option<PathBuf>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl CompareConfig {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Invalid compare configuration")
    }

    /// Load `explicit` if given (it must exist), else `<git_dir>/compare.toml` if present
    pub fn load(explicit: Option<&Path>, git_dir: &Path) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = git_dir.join(CONFIG_FILE_NAME);
                if !default_path.is_file() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");

        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKERS).max(1)
    }

    /// Allowed signers path resolved against the repository root
    pub fn allowed_signers_path(&self, repository_root: &Path) -> Option<PathBuf> {
        self.allowed_signers
            .as_ref()
            .map(|path| repository_root.join(path))
    }
}
