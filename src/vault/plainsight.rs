//! Plainsight codec: the exportable encoding.
//!
//! Encode pipeline:
//!
//! ```text
//! service name --AES-GCM--> hex key      AuthPair --SecretTransform--> base64 value
//!                     JSON --zlib--> base64 (standard, padded)
//! ```
//!
//! Decode runs the same stages backwards, and every stage has its own
//! error kind.  Authenticated decryption of the service names is the only
//! wrong-key detector.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::{debug, warn};

use super::deniable::{IdentityTransform, SecretTransform};
use super::field::Field;
use super::format::{PlainsightRecord, PlainsightRecordRef, WireBytes};
use super::store::{SecretStore, StoreState};
use crate::config::Settings;
use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::keys::MasterKey;
use crate::errors::{GhostpassError, Result};

/// Upper bound on the decompressed JSON document (64 MiB).
pub const MAX_INFLATED_LEN: usize = 64 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Prepare a usable store from an exported plainsight blob.
///
/// The returned store is always `StoreState::Stationary` and carries
/// `master_key`.  An `Authentication` error means the key is wrong or the
/// blob was altered; nothing is recovered in that case.
pub fn plainsight_unmarshal(
    master_key: MasterKey,
    encoded: impl AsRef<[u8]>,
) -> Result<SecretStore> {
    plainsight_unmarshal_with(master_key, encoded, &IdentityTransform)
}

/// Like [`plainsight_unmarshal`], inverting `transform` on every secret.
pub fn plainsight_unmarshal_with(
    master_key: MasterKey,
    encoded: impl AsRef<[u8]>,
    transform: &dyn SecretTransform,
) -> Result<SecretStore> {
    let encoded = trim_ascii_whitespace(encoded.as_ref());

    let compressed = BASE64
        .decode(encoded)
        .map_err(|e| GhostpassError::Decode(e.to_string()))?;

    let serialized = inflate(&compressed, MAX_INFLATED_LEN)?;

    let record: PlainsightRecord = serde_json::from_slice(&serialized)
        .map_err(|e| GhostpassError::Format(format!("plainsight JSON: {e}")))?;

    // Entries are visited in ascending hex order, so when two ciphertexts
    // decrypt to the same service the survivor does not depend on hashing.
    let entries = record.fields.unwrap_or_default();
    let fields = entries.iter().try_fold(
        BTreeMap::new(),
        |mut fields, (service_key, secret)| {
            let (service, field) = open_entry(&master_key, transform, service_key, secret)?;
            if fields.insert(service, field).is_some() {
                warn!("plainsight blob holds duplicate service entries; keeping the last");
            }
            Ok::<_, GhostpassError>(fields)
        },
    )?;

    debug!(
        fields = fields.len(),
        bytes = encoded.len(),
        version = record.version,
        declared_state = ?record.state,
        "decoded plainsight store"
    );

    Ok(SecretStore {
        version: record.version,
        state: StoreState::Stationary,
        name: record.name,
        master_key,
        fields,
    })
}

/// Recover one (service, field) pair from its hex key and stored secret.
fn open_entry(
    master_key: &MasterKey,
    transform: &dyn SecretTransform,
    service_key: &str,
    secret: &WireBytes,
) -> Result<(String, Field)> {
    let sealed = hex::decode(service_key).map_err(|e| GhostpassError::Hex(e.to_string()))?;

    let service = decrypt(master_key.as_bytes(), &sealed)?;
    let service = String::from_utf8(service).map_err(|_| GhostpassError::Authentication)?;

    let auth_pair = transform.invert(&service, secret.0.clone())?;
    let field = Field::reconstruct(master_key, &auth_pair)?;

    Ok((service, field))
}

/// Decompress a zlib stream, refusing to produce more than `limit` bytes.
fn inflate(compressed: &[u8], limit: usize) -> Result<Vec<u8>> {
    let mut serialized = Vec::new();
    ZlibDecoder::new(compressed)
        .take(limit as u64 + 1)
        .read_to_end(&mut serialized)
        .map_err(|e| GhostpassError::Compression(e.to_string()))?;

    if serialized.len() > limit {
        return Err(GhostpassError::Compression(format!(
            "decompressed store exceeds {limit} bytes"
        )));
    }
    Ok(serialized)
}

fn trim_ascii_whitespace(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if !first.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    while let [rest @ .., last] = bytes {
        if !last.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    bytes
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

impl SecretStore {
    /// Export the store as a plainsight blob using default settings.
    pub fn plainsight_marshal(&self) -> Result<String> {
        self.plainsight_marshal_with(&Settings::default(), &IdentityTransform)
    }

    /// Export the store as a plainsight blob.
    ///
    /// Service names are encrypted under the store's key with a fresh
    /// nonce each, secrets pass through `transform`, and the result is
    /// compressed and base64-encoded.  The store itself is not modified;
    /// on any failure nothing is returned.
    pub fn plainsight_marshal_with(
        &self,
        settings: &Settings,
        transform: &dyn SecretTransform,
    ) -> Result<String> {
        settings.validate()?;

        let mut encfields = BTreeMap::new();
        for (service, field) in &self.fields {
            let sealed = encrypt(self.master_key.as_bytes(), service.as_bytes())?;
            let secret = transform.apply(service, field.auth_pair())?;
            encfields.insert(hex::encode(sealed), WireBytes(secret));
        }

        let serialized = serde_json::to_vec(&PlainsightRecordRef {
            version: settings.format_version,
            state: StoreState::Plainsight,
            name: &self.name,
            fields: encfields,
        })
        .map_err(|e| GhostpassError::Format(format!("plainsight JSON: {e}")))?;

        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(serialized.len() / 2),
            Compression::new(settings.compression_level),
        );
        encoder
            .write_all(&serialized)
            .map_err(|e| GhostpassError::Compression(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| GhostpassError::Compression(e.to_string()))?;

        let encoded = BASE64.encode(compressed);
        debug!(
            fields = self.fields.len(),
            bytes = encoded.len(),
            "encoded plainsight store"
        );
        Ok(encoded)
    }
}
