//! Fields: the per-service entries of a secret store.
//!
//! A `Field` persists exactly one thing, its AuthPair.  Everything else
//! on the field (`FieldAttributes`) is recomputed from the AuthPair and
//! the master key by `rederive`, which is why both encodings can leave
//! the attributes out.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use super::format::{base64_decode, base64_encode};
use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::keys::MasterKey;
use crate::errors::{GhostpassError, Result};

/// Largest AuthPair accepted by rederivation and reconstruction (64 KiB).
pub const MAX_AUTHPAIR_LEN: usize = 64 * 1024;

/// Separator between username and secret inside a sealed AuthPair.
const CREDENTIAL_SEPARATOR: char = ':';

/// Attributes derived from (master key, AuthPair). Never persisted.
#[derive(Clone)]
pub struct FieldAttributes {
    /// `HMAC-SHA256(fingerprint_key, authpair)`.
    fingerprint: [u8; 32],
}

impl FieldAttributes {
    /// The keyed fingerprint of the AuthPair.
    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }
}

impl PartialEq for FieldAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint.ct_eq(&other.fingerprint).into()
    }
}

impl Eq for FieldAttributes {}

impl std::fmt::Debug for FieldAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAttributes")
            .field("fingerprint", &hex::encode(self.fingerprint))
            .finish()
    }
}

/// A single entry in a secret store.
///
/// Serializes as `{"authpair": "<base64>"}`; the derived attributes are
/// skipped on the way out and absent on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(
        rename = "authpair",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    auth_pair: Vec<u8>,

    #[serde(skip)]
    attributes: Option<FieldAttributes>,
}

/// Username and secret recovered from a sealed AuthPair.
pub struct Credentials {
    pub username: String,
    pub secret: Zeroizing<String>,
}

impl Field {
    /// Seal `username:secret` under `master_key` into a new, complete field.
    pub fn seal(master_key: &MasterKey, username: &str, secret: &str) -> Result<Self> {
        if username.contains(CREDENTIAL_SEPARATOR) {
            return Err(GhostpassError::Encryption(format!(
                "cannot seal credential: username contains '{CREDENTIAL_SEPARATOR}'"
            )));
        }

        let mut plain = Zeroizing::new(String::with_capacity(username.len() + secret.len() + 1));
        plain.push_str(username);
        plain.push(CREDENTIAL_SEPARATOR);
        plain.push_str(secret);

        let auth_pair = encrypt(master_key.as_bytes(), plain.as_bytes())?;
        Self::from_auth_pair(master_key, auth_pair)
    }

    /// Build a complete field around already-prepared AuthPair material.
    pub fn from_auth_pair(master_key: &MasterKey, auth_pair: Vec<u8>) -> Result<Self> {
        Self {
            auth_pair,
            attributes: None,
        }
        .rederive(master_key)
    }

    /// Rebuild a field from a secret carried in a plainsight blob.
    ///
    /// Structural problems surface as `Reconstruction` rather than
    /// `Derivation` so import errors point at the blob.
    pub fn reconstruct(master_key: &MasterKey, secret: &[u8]) -> Result<Self> {
        check_auth_pair(secret).map_err(GhostpassError::Reconstruction)?;

        Self {
            auth_pair: secret.to_vec(),
            attributes: None,
        }
        .rederive(master_key)
        .map_err(|e| match e {
            GhostpassError::Derivation(msg) => GhostpassError::Reconstruction(msg),
            other => other,
        })
    }

    /// Recompute the derived attributes under `master_key`.
    ///
    /// Consumes the partial field and returns a complete one; any stale
    /// attributes are replaced.
    pub fn rederive(self, master_key: &MasterKey) -> Result<Self> {
        check_auth_pair(&self.auth_pair).map_err(GhostpassError::Derivation)?;

        let mut fingerprint_key = master_key.derive_fingerprint_key()?;
        let mac = Hmac::<Sha256>::new_from_slice(&fingerprint_key);
        fingerprint_key.zeroize();

        let mut mac =
            mac.map_err(|e| GhostpassError::Derivation(format!("invalid HMAC key: {e}")))?;
        mac.update(&self.auth_pair);

        let mut fingerprint = [0u8; 32];
        fingerprint.copy_from_slice(&mac.finalize().into_bytes());

        Ok(Self {
            auth_pair: self.auth_pair,
            attributes: Some(FieldAttributes { fingerprint }),
        })
    }

    /// Decrypt a sealed AuthPair back into its username and secret.
    pub fn reveal(&self, master_key: &MasterKey) -> Result<Credentials> {
        let plain = Zeroizing::new(decrypt(master_key.as_bytes(), &self.auth_pair)?);

        let text = std::str::from_utf8(&plain).map_err(|_| {
            GhostpassError::Reconstruction("sealed credential is not valid UTF-8".into())
        })?;
        let (username, secret) = text.split_once(CREDENTIAL_SEPARATOR).ok_or_else(|| {
            GhostpassError::Reconstruction("sealed credential has no separator".into())
        })?;

        Ok(Credentials {
            username: username.to_string(),
            secret: Zeroizing::new(secret.to_string()),
        })
    }

    /// The persisted credential material.
    pub fn auth_pair(&self) -> &[u8] {
        &self.auth_pair
    }

    /// Derived attributes, `None` while the field is still partial.
    pub fn attributes(&self) -> Option<&FieldAttributes> {
        self.attributes.as_ref()
    }

    /// Returns `true` once rederivation has run.
    pub fn is_complete(&self) -> bool {
        self.attributes.is_some()
    }
}

/// Structural check shared by rederivation and reconstruction.
fn check_auth_pair(auth_pair: &[u8]) -> std::result::Result<(), String> {
    if auth_pair.is_empty() {
        return Err("authpair cannot be empty".into());
    }
    if auth_pair.len() > MAX_AUTHPAIR_LEN {
        return Err(format!(
            "authpair is {} bytes, limit is {MAX_AUTHPAIR_LEN}",
            auth_pair.len()
        ));
    }
    Ok(())
}
