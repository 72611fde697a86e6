//! Codec configuration (`.ghostpass.toml`).

pub mod settings;

pub use settings::Settings;
