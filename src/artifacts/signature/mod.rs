//! Commit signatures
//!
//! - `allowed_signers`: the trust file mapping principals to SSH keys
//! - `sshsig`: parsing and verification of armored `SSHSIG` signatures
//!
//! A signed commit carries its signature in a `gpgsig` header whose value
//! continues over lines starting with a single space. The signed payload is
//! the commit body with that header removed.

pub mod allowed_signers;
pub mod sshsig;

use crate::artifacts::signature::allowed_signers::AllowedSigners;
use crate::artifacts::signature::sshsig::{GIT_NAMESPACE, SshSignature};
use serde::Serialize;

/// Header names that carry a commit signature
const SIGNATURE_HEADERS: [&str; 2] = ["gpgsig", "gpgsig-sha256"];

/// Raw outcome of checking a commit's embedded signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SignatureCheck {
    Missing,
    Good { principal: String, fingerprint: String },
    Bad { reason: String },
}

/// Split a raw commit body into its armored signature and the signed payload
///
/// # Returns
///
/// `None` when the commit carries no `gpgsig` header.
pub fn extract_signature(body: &[u8]) -> Option<(String, Vec<u8>)> {
    let header_end = find_header_end(body);
    let (headers, rest) = body.split_at(header_end);

    let mut signature: Option<Vec<String>> = None;
    let mut payload = Vec::with_capacity(body.len());
    // Some(true) while inside the checked header, Some(false) inside a stripped one
    let mut collecting: Option<bool> = None;

    for line in headers.split_inclusive(|byte| *byte == b'\n') {
        if let Some(continuation) = line.strip_prefix(b" ")
            && let Some(keep) = collecting
        {
            if keep && let Some(lines) = signature.as_mut() {
                lines.push(trim_line_end(continuation));
            }
            continue;
        }
        collecting = None;

        let signature_value = SIGNATURE_HEADERS.iter().find_map(|header| {
            line.strip_prefix(header.as_bytes())
                .and_then(|rest| rest.strip_prefix(b" "))
                .map(|value| (*header, value))
        });

        match signature_value {
            Some(("gpgsig", value)) if signature.is_none() => {
                collecting = Some(true);
                signature = Some(vec![trim_line_end(value)]);
            }
            Some(_) => collecting = Some(false),
            None => payload.extend_from_slice(line),
        }
    }

    let lines = signature.filter(|lines| !lines.is_empty())?;
    payload.extend_from_slice(rest);

    let mut armored = lines.join("\n");
    armored.push('\n');
    Some((armored, payload))
}

/// Check the signature of a raw commit body against the trusted signers
///
/// `committer_email` is preferred as the principal when it may use the key.
pub fn check_commit_signature(
    body: &[u8],
    signers: &AllowedSigners,
    committer_email: &str,
) -> SignatureCheck {
    let Some((armored, payload)) = extract_signature(body) else {
        return SignatureCheck::Missing;
    };

    let signature = match SshSignature::from_armored(&armored) {
        Ok(signature) => signature,
        Err(err) => return SignatureCheck::Bad { reason: err.to_string() },
    };
    if let Err(err) = signature.verify(GIT_NAMESPACE, &payload) {
        return SignatureCheck::Bad { reason: err.to_string() };
    }

    let key = signature.public_key();
    let fingerprint = key.fingerprint();
    match signers.principal_for(key, GIT_NAMESPACE, committer_email) {
        Some(principal) => SignatureCheck::Good {
            principal,
            fingerprint,
        },
        None => SignatureCheck::Bad {
            reason: format!("no trusted principal for key {fingerprint}"),
        },
    }
}

/// Offset of the blank line separating headers from the message, or the body length
fn find_header_end(body: &[u8]) -> usize {
    body.windows(2)
        .position(|window| window == b"\n\n")
        .map(|position| position + 1)
        .unwrap_or(body.len())
}

fn trim_line_end(line: &[u8]) -> String {
    String::from_utf8_lossy(line)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}
