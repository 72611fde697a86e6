//! Stationary codec: the local, cheap-to-rehydrate JSON encoding.
//!
//! Service names are stored in the clear and AuthPairs are stored as-is,
//! so decoding only has to rederive each field's attributes.

use std::collections::BTreeMap;

use tracing::debug;

use super::format::{StationaryRecord, StationaryRecordRef};
use super::store::{SecretStore, StoreState};
use crate::crypto::keys::MasterKey;
use crate::errors::{GhostpassError, Result};

/// Turn a stationary blob back into a usable `SecretStore`.
///
/// The key is not stored in the blob; it must be the one the fields were
/// created under.  Fails with `Format` on malformed JSON and `Derivation`
/// on a structurally invalid AuthPair.
pub fn stationary_unmarshal(master_key: MasterKey, serialized: &[u8]) -> Result<SecretStore> {
    let record: StationaryRecord = serde_json::from_slice(serialized)
        .map_err(|e| GhostpassError::Format(format!("stationary JSON: {e}")))?;

    let fields = record
        .fields
        .unwrap_or_default()
        .into_iter()
        .map(|(service, partial)| {
            partial
                .rederive(&master_key)
                .map(|field| (service, field))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    debug!(fields = fields.len(), bytes = serialized.len(), "decoded stationary store");

    Ok(SecretStore {
        version: record.version,
        state: record.state,
        name: record.name,
        master_key,
        fields,
    })
}

impl SecretStore {
    /// Serialize the store as a stationary blob.
    ///
    /// Derived attributes and the master key are left out.
    pub fn stationary_marshal(&self) -> Result<Vec<u8>> {
        let serialized = serde_json::to_vec(&StationaryRecordRef {
            version: self.version,
            state: StoreState::Stationary,
            name: &self.name,
            fields: &self.fields,
        })
        .map_err(|e| GhostpassError::Format(format!("stationary JSON: {e}")))?;

        debug!(fields = self.fields.len(), bytes = serialized.len(), "encoded stationary store");
        Ok(serialized)
    }
}
