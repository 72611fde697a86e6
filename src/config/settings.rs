use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{GhostpassError, Result};
use crate::vault::format::CURRENT_VERSION;

/// Codec configuration, loaded from `.ghostpass.toml`.
///
/// Every field has a sensible default so the codecs work without any
/// config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Version number embedded in every encoded blob.
    #[serde(default = "default_format_version")]
    pub format_version: i64,

    /// zlib level for plainsight export, 0 (store) to 9 (best).
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_format_version() -> i64 {
    CURRENT_VERSION
}

fn default_compression_level() -> u32 {
    6 // zlib default
}

// ── Implementation ───────────────────────────────────────────────────

/// Highest level zlib accepts.
const MAX_COMPRESSION_LEVEL: u32 = 9;

impl Default for Settings {
    fn default() -> Self {
        Self {
            format_version: default_format_version(),
            compression_level: default_compression_level(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".ghostpass.toml";

    /// Load settings from `<project_dir>/.ghostpass.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        Self::from_toml_str(&contents).map_err(|e| {
            GhostpassError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(contents).map_err(|e| GhostpassError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the codecs cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(GhostpassError::Config(format!(
                "compression_level must be at most {MAX_COMPRESSION_LEVEL} (got {})",
                self.compression_level
            )));
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.format_version, CURRENT_VERSION);
        assert_eq!(s.compression_level, 6);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
format_version = 3
compression_level = 9
"#;
        fs::write(tmp.path().join(".ghostpass.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.format_version, 3);
        assert_eq!(settings.compression_level, 9);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".ghostpass.toml"), "compression_level = 1\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.compression_level, 1);
        assert_eq!(settings.format_version, CURRENT_VERSION);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".ghostpass.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(GhostpassError::Config(_))));
    }

    #[test]
    fn out_of_range_compression_level_is_rejected() {
        let result = Settings::from_toml_str("compression_level = 12\n");
        assert!(matches!(result, Err(GhostpassError::Config(_))));
    }
}
