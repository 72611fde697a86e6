//! AES-256-GCM authenticated encryption.
//!
//! Every call to `encrypt` draws a fresh random 12-byte nonce, so sealing
//! the same service name twice yields unrelated ciphertexts.  That is what
//! makes plainsight identifiers indistinguishable from random bytes.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{GhostpassError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    // A wrong-sized key is the only way cipher setup can fail.
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| GhostpassError::Encryption(format!("invalid key length: {e}")))?;

    // Fresh nonce per call; identical service names must not collide.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // Seal in place behind the nonce so the output is allocated once.
    let mut sealed = Vec::with_capacity(sealed_len(plaintext.len()));
    sealed.extend_from_slice(&nonce);
    let mut body = plaintext.to_vec();
    cipher
        .encrypt_in_place(&nonce, b"", &mut body)
        .map_err(|e| GhostpassError::Encryption(format!("encryption error: {e}")))?;
    sealed.append(&mut body);

    Ok(sealed)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Any failure (short input, bad key, tag mismatch) is reported as
/// `Authentication`: from the outside a wrong key and a tampered blob
/// look the same.
pub fn decrypt(key: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
    // Anything shorter than nonce + tag cannot have been produced by `encrypt`.
    if sealed.len() < sealed_len(0) {
        return Err(GhostpassError::Authentication);
    }

    let (nonce_bytes, body) = sealed.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| GhostpassError::Authentication)?;

    // Verify the tag and strip it in one pass.
    let mut plaintext = body.to_vec();
    cipher
        .decrypt_in_place(Nonce::from_slice(nonce_bytes), b"", &mut plaintext)
        .map_err(|_| GhostpassError::Authentication)?;

    Ok(plaintext)
}

/// Length of the sealed output for a plaintext of `plaintext_len` bytes.
pub fn sealed_len(plaintext_len: usize) -> usize {
    NONCE_LEN + plaintext_len + TAG_LEN
}
