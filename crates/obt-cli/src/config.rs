//! Configuration management for the `obt` tool
//!
//! Configuration is stored in TOML format. A missing file means defaults.
//!
//! # Configuration File Locations
//!
//! - Linux: `~/.config/obt/config.toml`
//! - macOS: `~/Library/Application Support/io.fio.obt/config.toml`
//! - Windows: `%APPDATA%\fio\obt\config\config.toml`

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tool configuration
///
/// # Example TOML
///
/// ```toml
/// [identity]
/// # private_key = "5J..."   # WIF or PVT_K1_, prefer key_file
/// key_file = "/home/alice/.obt/key"
///
/// [output]
/// format = "table"  # "table" | "json" | "quiet"
///
/// [logging]
/// level = "warn"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the local private key comes from.
#[derive(Clone, Default, Deserialize)]
pub struct IdentityConfig {
    /// Inline private key string
    #[serde(default)]
    pub private_key: Option<String>,

    /// File holding the private key string
    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("key_file", &self.key_file)
            .finish()
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Output format: "table", "json", "quiet"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: default_format() }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

/// Values from flags and environment that take precedence over the file.
#[derive(Clone, Default)]
pub struct CliOverrides {
    pub output_format: Option<String>,
    pub private_key: Option<String>,
    pub key_file: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub debug: Option<bool>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from custom path or default
    pub fn load_from(custom_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = custom_path {
            Self::load(path)
        } else {
            Self::load_default()
        }
    }

    /// Get default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "fio", "obt")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply CLI overrides; any value set there wins over the file.
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(format) = &overrides.output_format {
            self.output.format = format.clone();
        }
        if let Some(key) = &overrides.private_key {
            self.identity.private_key = Some(key.clone());
            self.identity.key_file = None;
        } else if let Some(path) = &overrides.key_file {
            self.identity.key_file = Some(path.clone());
            self.identity.private_key = None;
        }
        if overrides.debug == Some(true) {
            self.logging.level = "debug".to_string();
        } else if overrides.verbose == Some(true) {
            self.logging.level = "info".to_string();
        }
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_formats = ["table", "json", "quiet"];
        if !valid_formats.contains(&self.output.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid output format '{}'. Valid values: {:?}",
                self.output.format, valid_formats
            )));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level '{}'. Valid values: {:?}",
                self.logging.level, valid_levels
            )));
        }

        if self.identity.private_key.is_some() && self.identity.key_file.is_some() {
            return Err(ConfigError::ValidationError(
                "identity.private_key and identity.key_file are mutually exclusive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.format, "table");
        assert_eq!(config.logging.level, "warn");
        assert!(config.identity.private_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"json\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.output.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_rejects_bad_format() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"xml\"").unwrap();

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output\nformat = ").unwrap();

        assert!(matches!(Config::load(file.path()), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_key_sources_are_exclusive() {
        let mut config = Config::default();
        config.identity.private_key = Some("5J...".into());
        config.identity.key_file = Some(PathBuf::from("/tmp/key"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.identity.key_file = Some(PathBuf::from("/tmp/key"));

        let overrides = CliOverrides {
            output_format: Some("json".into()),
            private_key: Some("PVT_K1_x".into()),
            debug: Some(true),
            ..Default::default()
        };
        let config = config.with_overrides(&overrides);
        assert_eq!(config.output.format, "json");
        assert_eq!(config.identity.private_key.as_deref(), Some("PVT_K1_x"));
        assert!(config.identity.key_file.is_none());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"info\"\n").unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.logging.level, "info");
        assert_eq!(loaded.output.format, "table");
        assert!(loaded.identity.private_key.is_none());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let identity = IdentityConfig {
            private_key: Some("5J9bWm2ThenDm3tjvmUgHtWCVMUdjRR1pxnRtnJjvKA4b2ut5WK".into()),
            key_file: None,
        };
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("5J9b"));
        assert!(rendered.contains("REDACTED"));
    }
}
