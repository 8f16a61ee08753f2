//! Configuration path discovery.
//!
//! Resolution order: CLI argument → environment variable → XDG config → defaults.

use std::path::{Path, PathBuf};

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via `FC_CONFIG`.
    Environment,

    /// Found in the XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable holding an explicit config path.
pub const ENV_CONFIG_PATH: &str = "FC_CONFIG";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.toml";

/// Application directory under the XDG config home.
const APP_NAME: &str = "fc-belt";

/// Find the config file to load, if any.
///
/// 1. Explicit CLI path (if it exists)
/// 2. `FC_CONFIG` (if it points to an existing file)
/// 3. `$XDG_CONFIG_HOME/fc-belt/config.toml`
/// 4. None (built-in defaults)
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<(PathBuf, ConfigSource)> {
    if let Some(path) = cli_path {
        if path.exists() {
            return Some((path.to_path_buf(), ConfigSource::CliArgument));
        }
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Some((path, ConfigSource::Environment));
        }
    }

    let xdg = dirs::config_dir()?.join(APP_NAME).join(CONFIG_FILENAME);
    if xdg.exists() {
        return Some((xdg, ConfigSource::XdgConfig));
    }

    None
}
