//! Configuration loading and validation for fc-core.
//!
//! This module handles:
//! - Loading `config.toml` scan settings
//! - Config resolution order (CLI > env > XDG > defaults)
//! - Semantic validation (confidence level range, positive steps)

pub mod resolve;

pub use resolve::{resolve_config_path, ConfigSource};

use crate::region::DEFAULT_MAX_ITERATIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl From<ConfigError> for fc_common::Error {
    fn from(err: ConfigError) -> Self {
        fc_common::Error::Config(err.to_string())
    }
}

/// Scan and expansion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Target confidence level in (0, 1).
    pub confidence_level: f64,
    /// Cap on admitted points per belt expansion.
    pub max_iterations: usize,
    /// Tie-break seed; OS entropy when absent.
    pub seed: Option<u64>,
    /// Signal increment of the rejection scan.
    pub signal_step: f64,
    /// Cap on signal increments of the rejection scan.
    pub max_steps: usize,
    /// Violating-to-conserving signal ratio of the separation scan.
    pub scale: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            confidence_level: 0.90,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
            signal_step: 0.001,
            max_steps: 1_000_000,
            scale: 0.2,
        }
    }
}

impl ScanConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = toml::from_str(content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(path, &content)
    }

    /// Semantic checks serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ConfigError::Invalid {
                field: "confidence_level",
                message: format!("must lie in (0, 1), got {}", self.confidence_level),
            });
        }
        if !(self.signal_step.is_finite() && self.signal_step > 0.0) {
            return Err(ConfigError::Invalid {
                field: "signal_step",
                message: format!("must be positive, got {}", self.signal_step),
            });
        }
        if !(self.scale.is_finite() && self.scale >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "scale",
                message: format!("must be non-negative, got {}", self.scale),
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "max_iterations",
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "max_steps",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ScanConfig,
    /// Path of the loaded file (None if using defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve and load the scan configuration.
///
/// An explicit `cli_path` that does not exist is an error; missing files on
/// the implicit paths fall back to defaults.
pub fn load_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
    }

    match resolve_config_path(cli_path) {
        Some((path, source)) => Ok(ResolvedConfig {
            config: ScanConfig::from_file(&path)?,
            path: Some(path),
            source,
        }),
        None => Ok(ResolvedConfig {
            config: ScanConfig::default(),
            path: None,
            source: ConfigSource::BuiltinDefault,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.confidence_level, 0.90);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config =
            ScanConfig::from_toml_str(Path::new("inline"), "confidence_level = 0.99\nseed = 7\n")
                .unwrap();
        assert_eq!(config.confidence_level, 0.99);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.scale, 0.2);
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = ScanConfig::from_toml_str(Path::new("inline"), "confidence = 0.9\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_semantic_validation() {
        let err =
            ScanConfig::from_toml_str(Path::new("inline"), "confidence_level = 1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "confidence_level",
                ..
            }
        ));
        let err = ScanConfig::from_toml_str(Path::new("inline"), "signal_step = -0.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "signal_step", .. }));
        let err = ScanConfig::from_toml_str(Path::new("inline"), "max_steps = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_steps", .. }));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scale = 0.5\nmax_iterations = 10\n").unwrap();

        let resolved = load_config(Some(&path)).unwrap();
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.path.as_deref(), Some(path.as_path()));
        assert_eq!(resolved.config.scale, 0.5);
        assert_eq!(resolved.config.max_iterations, 10);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_config_error_maps_to_common_error() {
        let err: fc_common::Error = ConfigError::Invalid {
            field: "scale",
            message: "bad".into(),
        }
        .into();
        assert_eq!(err.code(), 40);
    }
}
