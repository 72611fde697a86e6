//! Cryptographic primitives for ghostpass.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption and decryption (`encryption`)
//! - The zeroizing `MasterKey` and HKDF sub-key derivation (`keys`)

pub mod encryption;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, MasterKey};
pub use encryption::{decrypt, encrypt};
pub use keys::{derive_fingerprint_key, MasterKey, KEY_LEN};
