//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration lives in a small TOML file. Every field is
//! optional; anything left out falls back to a path under the resolved root
//! folder or to a compiled default.
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `POPRAKO_ROOT_FOLDER` environment variable
//! 3. `root_folder` key of the TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "POPRAKO_ROOT_FOLDER";

/// Database file name used when the config does not name one
pub const DEFAULT_DATABASE_FILE: &str = "poprako.db";

/// Export directory name used when the config does not name one
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database and exports (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Path to SQLite database file, relative paths resolve against the root folder
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Directory receiving LabelPlus exports, relative paths resolve against the root folder
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Number of export files kept before the oldest are pruned
    ///
    /// Default: 30
    #[serde(default = "default_max_exports")]
    pub max_exports: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            database_path: None,
            export_dir: None,
            max_exports: default_max_exports(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_max_exports() -> usize {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Filesystem locations after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub export_dir: PathBuf,
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config = Self::from_toml_str(&content)?;
        info!("Loaded TOML configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, degrading to defaults when no file exists
    ///
    /// An explicit path that does not exist is an error. Without an explicit
    /// path the platform config location is tried; if nothing is found there
    /// the compiled defaults are used and a warning is logged.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                warn!("Config file not found at {:?}, using defaults", path);
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Resolve root folder, database path and export directory
    pub fn resolve_paths(&self, cli_root: Option<&Path>) -> ResolvedPaths {
        let root_folder = resolve_root_folder(cli_root, ROOT_FOLDER_ENV, self);

        let database_path = anchor(
            &root_folder,
            self.database_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE)),
        );
        let export_dir = anchor(
            &root_folder,
            self.export_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR)),
        );

        ResolvedPaths {
            root_folder,
            database_path,
            export_dir,
        }
    }
}

fn anchor(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

/// Root folder resolution in priority order (see module docs)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Platform location of the config file (`<config dir>/poprako/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("poprako").join("config.toml"))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("poprako"))
        .unwrap_or_else(|| PathBuf::from("./poprako_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_max_exports() {
        assert_eq!(default_max_exports(), 30);
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn test_anchor_keeps_absolute_paths() {
        let root = Path::new("/srv/poprako");
        assert_eq!(
            anchor(root, PathBuf::from("/var/db/p.db")),
            PathBuf::from("/var/db/p.db")
        );
        assert_eq!(
            anchor(root, PathBuf::from("p.db")),
            PathBuf::from("/srv/poprako/p.db")
        );
    }
}
