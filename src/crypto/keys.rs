//! Master key handling and HKDF-SHA256 sub-key derivation.
//!
//! The master key never leaves this wrapper except by reference.  Field
//! fingerprints are keyed with a dedicated sub-key so that the raw master
//! key is only ever fed to AES-GCM and HKDF.

use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::errors::{GhostpassError, Result};

/// Length of the master key and derived sub-keys (256 bits).
pub const KEY_LEN: usize = 32;

/// HKDF context for the field fingerprint sub-key.
const FINGERPRINT_INFO: &[u8] = b"ghostpass-field-fingerprint";

/// Derive the sub-key used to fingerprint field AuthPairs.
pub fn derive_fingerprint_key(master_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(master_key, FINGERPRINT_INFO)
}

/// Internal helper: run HKDF-SHA256 expand with the given `info`.
///
/// The master key is already uniformly random, so no salt is used.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| GhostpassError::Derivation(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A 32-byte master key that zeroes its memory when dropped.
///
/// Cloning copies the bytes into a second zeroizing wrapper; both copies
/// are wiped independently.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Create a `MasterKey` from a slice, rejecting anything but 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            GhostpassError::Encryption(format!(
                "master key must be exactly {KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Generate a random key from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to HKDF or encryption).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive the field fingerprint sub-key from this master key.
    pub fn derive_fingerprint_key(&self) -> Result<[u8; KEY_LEN]> {
        derive_fingerprint_key(&self.bytes)
    }
}

impl PartialEq for MasterKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for MasterKey {}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}
