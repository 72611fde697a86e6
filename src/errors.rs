use thiserror::Error;

/// All errors that can occur while encoding or decoding a secret store.
///
/// Every variant is final for the call that produced it: the codecs fail
/// fast and never hand back a partially decoded store.
#[derive(Debug, Error)]
pub enum GhostpassError {
    // --- Wire errors ---
    #[error("Base64 decode failed: {0}")]
    Decode(String),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Invalid store format: {0}")]
    Format(String),

    #[error("Invalid hex service identifier: {0}")]
    Hex(String),

    // --- Crypto errors ---
    #[error("Authentication failed — wrong master key or corrupted blob")]
    Authentication,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    // --- Field errors ---
    #[error("Field reconstruction failed: {0}")]
    Reconstruction(String),

    #[error("Field derivation failed: {0}")]
    Derivation(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for ghostpass results.
pub type Result<T> = std::result::Result<T, GhostpassError>;
