//! Default paths for reveille components
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/reveille/config.toml` or `~/.config/reveille/config.toml`
//! - Data: `$XDG_DATA_HOME/reveille` or `~/.local/share/reveille`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const REVEILLE_CONFIG_ENV: &str = "REVEILLE_CONFIG";

/// Environment variable for overriding the data directory
pub const REVEILLE_DATA_DIR_ENV: &str = "REVEILLE_DATA_DIR";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Database filename within the data directory
pub const DATABASE_FILENAME: &str = "reveille.db";

/// Application subdirectory name
const APP_DIR: &str = "reveille";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$REVEILLE_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/reveille/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/reveille/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(REVEILLE_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_path_without_env()
}

/// Get the config path without checking the REVEILLE_CONFIG env var.
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$REVEILLE_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/reveille` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/reveille` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(REVEILLE_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking the REVEILLE_DATA_DIR env var.
/// Used for default values in configs where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
