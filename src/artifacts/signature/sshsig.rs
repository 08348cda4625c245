//! Armored SSH signatures (`ssh-keygen -Y sign` format)
//!
//! ## Format
//!
//! The armor wraps a base64 blob:
//!
//! ```text
//! "SSHSIG" || u32 version || string public_key || string namespace
//!          || string reserved || string hash_algorithm || string signature
//! ```
//!
//! The signer signs `"SSHSIG" || string namespace || string reserved ||
//! string hash_algorithm || string H(message)`. Only `ssh-ed25519` keys are
//! supported.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;

const MAGIC: &[u8; 6] = b"SSHSIG";
const ARMOR_BEGIN: &str = "-----BEGIN SSH SIGNATURE-----";
const ARMOR_END: &str = "-----END SSH SIGNATURE-----";
const SIG_VERSION: u32 = 1;
const ED25519: &str = "ssh-ed25519";

/// Namespace git signs commits under
pub const GIT_NAMESPACE: &str = "git";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("unsupported signature format (only SSH signatures can be checked)")]
    UnsupportedFormat,
    #[error("malformed signature: {0}")]
    Malformed(String),
    #[error("unsupported key type {0}")]
    UnsupportedKeyType(String),
    #[error("unsupported hash algorithm {0}")]
    UnsupportedHashAlgorithm(String),
    #[error("signature namespace is {found}, expected {expected}")]
    NamespaceMismatch { expected: String, found: String },
    #[error("signature does not match the signed content")]
    InvalidSignature,
}

/// Public key in SSH wire format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    blob: Bytes,
    key_type: String,
    key: Bytes,
}

impl PublicKey {
    /// Parse a key from its SSH wire encoding
    pub fn from_blob(blob: Bytes) -> Result<Self, SignatureError> {
        let mut reader = blob.clone();
        let key_type = read_utf8(&mut reader, "key type")?;
        if key_type != ED25519 {
            return Err(SignatureError::UnsupportedKeyType(key_type));
        }

        let key = read_string(&mut reader, "public key")?;
        if key.len() != 32 {
            return Err(SignatureError::Malformed(format!(
                "ed25519 key has {} bytes",
                key.len()
            )));
        }

        Ok(PublicKey {
            blob,
            key_type,
            key,
        })
    }

    /// Parse the `<type> <base64>` form used in allowed-signers and `.pub` files
    pub fn from_openssh(key_type: &str, encoded: &str) -> Result<Self, SignatureError> {
        let blob = STANDARD
            .decode(encoded)
            .map_err(|err| SignatureError::Malformed(format!("public key: {err}")))?;
        let key = Self::from_blob(blob.into())?;

        if key.key_type != key_type {
            return Err(SignatureError::Malformed(format!(
                "key is declared as {key_type} but encodes {}",
                key.key_type
            )));
        }

        Ok(key)
    }

    pub fn key_type(&self) -> &str {
        &self.key_type
    }

    /// `SHA256:<base64>` fingerprint as printed by `ssh-keygen -l`
    pub fn fingerprint(&self) -> String {
        format!("SHA256:{}", STANDARD_NO_PAD.encode(Sha256::digest(&self.blob)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    fn digest(&self, message: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(message).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(message).to_vec(),
        }
    }
}

impl TryFrom<&str> for HashAlgorithm {
    type Error = SignatureError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(SignatureError::UnsupportedHashAlgorithm(other.to_string())),
        }
    }
}

/// A parsed `SSHSIG` signature
#[derive(Debug, Clone)]
pub struct SshSignature {
    public_key: PublicKey,
    namespace: String,
    reserved: Bytes,
    hash_algorithm: HashAlgorithm,
    signature: Bytes,
}

impl SshSignature {
    /// Parse an armored signature as stored in a commit's `gpgsig` header
    pub fn from_armored(armored: &str) -> Result<Self, SignatureError> {
        let armored = armored.trim();
        if armored.starts_with("-----BEGIN PGP") {
            return Err(SignatureError::UnsupportedFormat);
        }

        let body = armored
            .strip_prefix(ARMOR_BEGIN)
            .and_then(|rest| rest.strip_suffix(ARMOR_END))
            .ok_or_else(|| SignatureError::Malformed("missing SSH signature armor".to_string()))?;
        let encoded = body.split_whitespace().collect::<String>();
        let blob = STANDARD
            .decode(encoded)
            .map_err(|err| SignatureError::Malformed(format!("armor: {err}")))?;

        Self::from_blob(blob.into())
    }

    fn from_blob(mut blob: Bytes) -> Result<Self, SignatureError> {
        if blob.remaining() < MAGIC.len() || &blob[..MAGIC.len()] != MAGIC {
            return Err(SignatureError::Malformed("missing SSHSIG preamble".to_string()));
        }
        blob.advance(MAGIC.len());

        let version = read_u32(&mut blob, "version")?;
        if version != SIG_VERSION {
            return Err(SignatureError::Malformed(format!("unsupported version {version}")));
        }

        let public_key = PublicKey::from_blob(read_string(&mut blob, "public key")?)?;
        let namespace = read_utf8(&mut blob, "namespace")?;
        let reserved = read_string(&mut blob, "reserved")?;
        let hash_algorithm = HashAlgorithm::try_from(read_utf8(&mut blob, "hash algorithm")?.as_str())?;

        let mut signature_blob = read_string(&mut blob, "signature")?;
        let signature_type = read_utf8(&mut signature_blob, "signature type")?;
        if signature_type != public_key.key_type {
            return Err(SignatureError::Malformed(format!(
                "{signature_type} signature made with {} key",
                public_key.key_type
            )));
        }
        let signature = read_string(&mut signature_blob, "signature")?;

        Ok(SshSignature {
            public_key,
            namespace,
            reserved,
            hash_algorithm,
            signature,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Check the signature over `message` in the given namespace
    pub fn verify(&self, namespace: &str, message: &[u8]) -> Result<(), SignatureError> {
        if self.namespace != namespace {
            return Err(SignatureError::NamespaceMismatch {
                expected: namespace.to_string(),
                found: self.namespace.clone(),
            });
        }

        let signed_data = signed_data(
            &self.namespace,
            &self.reserved,
            self.hash_algorithm,
            message,
        );

        ring::signature::UnparsedPublicKey::new(&ring::signature::ED25519, &self.public_key.key)
            .verify(&signed_data, &self.signature)
            .map_err(|_| SignatureError::InvalidSignature)
    }
}

fn signed_data(
    namespace: &str,
    reserved: &[u8],
    hash_algorithm: HashAlgorithm,
    message: &[u8],
) -> Vec<u8> {
    let mut data = BytesMut::new();
    data.put_slice(MAGIC);
    put_string(&mut data, namespace.as_bytes());
    put_string(&mut data, reserved);
    put_string(&mut data, hash_algorithm.as_str().as_bytes());
    put_string(&mut data, &hash_algorithm.digest(message));
    data.to_vec()
}

fn put_string(buffer: &mut BytesMut, value: &[u8]) {
    buffer.put_u32(value.len() as u32);
    buffer.put_slice(value);
}

fn read_u32(reader: &mut Bytes, field: &str) -> Result<u32, SignatureError> {
    if reader.remaining() < 4 {
        return Err(SignatureError::Malformed(format!("truncated {field}")));
    }
    Ok(reader.get_u32())
}

fn read_string(reader: &mut Bytes, field: &str) -> Result<Bytes, SignatureError> {
    let length = read_u32(reader, field)? as usize;
    if reader.remaining() < length {
        return Err(SignatureError::Malformed(format!("truncated {field}")));
    }
    Ok(reader.split_to(length))
}

fn read_utf8(reader: &mut Bytes, field: &str) -> Result<String, SignatureError> {
    let value = read_string(reader, field)?;
    String::from_utf8(value.to_vec())
        .map_err(|_| SignatureError::Malformed(format!("{field} is not valid UTF-8")))
}
