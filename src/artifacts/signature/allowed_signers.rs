//! Allowed signers file (`gpg.ssh.allowedSignersFile`)
//!
//! Each line reads `principals [options] key-type base64-key [comment]`.
//! Principals are comma-separated patterns where `*` and `?` are wildcards.
//! The only option honoured is `namespaces="..."`; `cert-authority` lines
//! are skipped since certificates are not supported.

use crate::artifacts::signature::sshsig::{PublicKey, SignatureError};
use anyhow::Context;
use regex::Regex;
use std::path::Path;

#[derive(Debug, Clone)]
struct AllowedSigner {
    principals: Vec<(String, Regex)>,
    namespaces: Option<Vec<String>>,
    key: PublicKey,
}

#[derive(Debug, Clone, Default)]
pub struct AllowedSigners {
    signers: Vec<AllowedSigner>,
}

impl AllowedSigners {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read allowed signers {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid allowed signers {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut signers = Vec::new();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match Self::parse_line(line) {
                Ok(Some(signer)) => signers.push(signer),
                Ok(None) => {}
                Err(err) => return Err(err.context(format!("line {}", number + 1))),
            }
        }

        Ok(AllowedSigners { signers })
    }

    fn parse_line(line: &str) -> anyhow::Result<Option<AllowedSigner>> {
        let tokens = tokenize(line);
        let mut tokens = tokens.iter().map(String::as_str);

        let principals = tokens.next().context("missing principals")?;
        let mut next = tokens.next().context("missing key")?;

        let mut namespaces = None;
        if !is_key_type(next) {
            for option in split_options(next) {
                let (name, value) = option.split_once('=').unwrap_or((option.as_str(), ""));
                match name.to_ascii_lowercase().as_str() {
                    "cert-authority" => return Ok(None),
                    "namespaces" => {
                        namespaces = Some(
                            value
                                .trim_matches('"')
                                .split(',')
                                .map(|namespace| namespace.trim().to_string())
                                .collect(),
                        )
                    }
                    _ => {}
                }
            }
            next = tokens.next().context("missing key type")?;
        }

        let encoded = tokens.next().context("missing key")?;
        let key = match PublicKey::from_openssh(next, encoded) {
            Ok(key) => key,
            Err(SignatureError::UnsupportedKeyType(key_type)) => {
                tracing::debug!(key_type, "skipping allowed signer with unsupported key");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let principals = principals
            .split(',')
            .filter(|pattern| !pattern.is_empty())
            .map(|pattern| Ok((pattern.to_string(), principal_pattern(pattern)?)))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Some(AllowedSigner {
            principals,
            namespaces,
            key,
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Whether `principal` may sign in `namespace` with `key`
    pub fn is_allowed(&self, principal: &str, key: &PublicKey, namespace: &str) -> bool {
        self.matching(key, namespace).any(|signer| {
            signer
                .principals
                .iter()
                .any(|(_, pattern)| pattern.is_match(principal))
        })
    }

    /// Principal a signature made with `key` is attributed to
    ///
    /// `preferred` when it is allowed to use the key, otherwise the first
    /// principal listed for the key.
    pub fn principal_for(&self, key: &PublicKey, namespace: &str, preferred: &str) -> Option<String> {
        if self.is_allowed(preferred, key, namespace) {
            return Some(preferred.to_string());
        }

        self.matching(key, namespace)
            .flat_map(|signer| signer.principals.iter())
            .map(|(principal, _)| principal.clone())
            .next()
    }

    /// Whether any principal is trusted with `key` in `namespace`
    pub fn trusts_key(&self, key: &PublicKey, namespace: &str) -> bool {
        self.matching(key, namespace).next().is_some()
    }

    fn matching<'a>(
        &'a self,
        key: &'a PublicKey,
        namespace: &'a str,
    ) -> impl Iterator<Item = &'a AllowedSigner> + 'a {
        self.signers.iter().filter(move |signer| {
            &signer.key == key
                && signer
                    .namespaces
                    .as_ref()
                    .is_none_or(|namespaces| namespaces.iter().any(|n| n == namespace))
        })
    }
}

fn is_key_type(token: &str) -> bool {
    token.starts_with("ssh-") || token.starts_with("ecdsa-") || token.starts_with("sk-")
}

/// Split on whitespace outside double quotes
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                current.push(ch);
            }
            ch if ch.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Split an options token on commas outside double quotes
fn split_options(token: &str) -> Vec<String> {
    let mut options = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in token.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                current.push(ch);
            }
            ',' if !quoted => options.push(std::mem::take(&mut current)),
            ch => current.push(ch),
        }
    }
    options.push(current);

    options
}

fn principal_pattern(pattern: &str) -> anyhow::Result<Regex> {
    let escaped = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");
    Regex::new(&format!("^(?i:{escaped})$")).context("Invalid principal pattern")
}
