//! Wire shapes shared by the stationary and plainsight codecs.
//!
//! Both encodings carry the same four top-level keys:
//!
//! ```text
//! { "version": <integer>, "state": "stationary" | "plainsight", "name": <str>, "fields": { ... } }
//! ```
//!
//! - **Stationary**: `fields` maps plaintext service names to
//!   `{"authpair": "<base64>"}`.
//! - **Plainsight**: `fields` maps lowercase-hex service ciphertexts to
//!   base64 secret bytes; the whole JSON document is then zlib-compressed
//!   and base64-encoded.
//!
//! Byte strings are always standard, padded base64 inside JSON.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::field::Field;
use super::store::StoreState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Format version embedded by encoders unless `Settings` overrides it.
pub const CURRENT_VERSION: i64 = 1;

// ---------------------------------------------------------------------------
// Stationary records
// ---------------------------------------------------------------------------

/// Borrowed view of a store, serialized as a stationary blob.
#[derive(Serialize)]
pub(crate) struct StationaryRecordRef<'a> {
    pub version: i64,
    pub state: StoreState,
    pub name: &'a str,
    pub fields: &'a BTreeMap<String, Field>,
}

/// A decoded stationary blob. Fields are partial until rederived.
#[derive(Deserialize)]
pub(crate) struct StationaryRecord {
    pub version: i64,
    pub state: StoreState,
    pub name: String,
    #[serde(default)]
    pub fields: Option<BTreeMap<String, Field>>,
}

// ---------------------------------------------------------------------------
// Plainsight records
// ---------------------------------------------------------------------------

/// Outgoing plainsight document, before compression.
#[derive(Serialize)]
pub(crate) struct PlainsightRecordRef<'a> {
    pub version: i64,
    pub state: StoreState,
    pub name: &'a str,
    pub fields: BTreeMap<String, WireBytes>,
}

/// Incoming plainsight document, after decompression.
///
/// Only `fields` has to be meaningful.  `state` is read as any JSON value
/// (or nothing) since decoding always lands in `StoreState::Stationary`,
/// and absent scalars fall back to their zero values.
#[derive(Deserialize)]
pub(crate) struct PlainsightRecord {
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub state: Option<serde_json::Value>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Option<BTreeMap<String, WireBytes>>,
}

/// Raw bytes that travel as a base64 string in JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WireBytes(pub Vec<u8>);

impl Serialize for WireBytes {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        base64_encode(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for WireBytes {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        base64_decode(deserializer).map(WireBytes)
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes_serialize_as_base64_string() {
        let json = serde_json::to_string(&WireBytes(b"user:tok".to_vec())).unwrap();
        assert_eq!(json, "\"dXNlcjp0b2s=\"");

        let back: WireBytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back.0, b"user:tok");
    }

    #[test]
    fn wire_bytes_reject_non_base64() {
        let result: std::result::Result<WireBytes, _> = serde_json::from_str("\"not base64!\"");
        assert!(result.is_err());
    }

    #[test]
    fn plainsight_record_accepts_null_fields() {
        let json = r#"{"version":7,"state":"whatever","name":"n","fields":null}"#;
        let record: PlainsightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.version, 7);
        assert!(record.fields.is_none());
    }

    #[test]
    fn plainsight_record_accepts_missing_scalars() {
        let record: PlainsightRecord = serde_json::from_str(r#"{"fields":{}}"#).unwrap();
        assert_eq!(record.version, 0);
        assert!(record.state.is_none());
        assert_eq!(record.name, "");
    }

    #[test]
    fn records_accept_versions_outside_u32() {
        let json = r#"{"version":-1,"state":"plainsight","name":"n","fields":{}}"#;
        let record: PlainsightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.version, -1);

        let json = r#"{"version":5000000000,"state":"stationary","name":"n","fields":{}}"#;
        let record: StationaryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.version, 5_000_000_000);
    }
}
