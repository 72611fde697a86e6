//! The in-memory secret store handed to and produced by the codecs.
//!
//! `SecretStore` owns its master key and a map of service name -> `Field`.
//! Every field it holds is attribute-complete under that key; fields are
//! rederived on insertion so the invariant cannot drift.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::Field;
use super::format::CURRENT_VERSION;
use crate::crypto::keys::MasterKey;
use crate::errors::Result;

/// Which encoding a store snapshot corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreState {
    /// Local, immediately usable.
    Stationary,
    /// Exported, compressed, identifiers encrypted.
    Plainsight,
}

/// A fully materialized secret store.
#[derive(Debug, Clone)]
pub struct SecretStore {
    pub(super) version: i64,
    pub(super) state: StoreState,
    pub(super) name: String,
    pub(super) master_key: MasterKey,
    pub(super) fields: BTreeMap<String, Field>,
}

impl SecretStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create an empty stationary store keyed by `master_key`.
    pub fn new(name: &str, master_key: MasterKey) -> Self {
        Self {
            version: CURRENT_VERSION,
            state: StoreState::Stationary,
            name: name.to_string(),
            master_key,
            fields: BTreeMap::new(),
        }
    }

    /// Add or replace the field for `service`.
    ///
    /// The field is rederived under this store's key before it is
    /// stored.  Returns the previous field, if any.
    pub fn insert_field(&mut self, service: &str, field: Field) -> Result<Option<Field>> {
        let field = field.rederive(&self.master_key)?;
        Ok(self.fields.insert(service.to_string(), field))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key every field of this store is (de)cipherable under.
    pub fn master_key(&self) -> &MasterKey {
        &self.master_key
    }

    /// Look up the field stored for `service`.
    pub fn field(&self, service: &str) -> Option<&Field> {
        self.fields.get(service)
    }

    /// Service names in ascending order.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// (service, field) pairs in ascending service order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields in the store.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
