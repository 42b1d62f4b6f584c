//! Unified path management for SiteScout files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/sitescout/         # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//!
//! ~/.local/share/sitescout/    # Data directory
//! └── store/                   # Key-value store (one JSON file per key)
//!     └── sitescout_history.json
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "sitescout";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolved config and data directories.
///
/// Both can be overridden, which is how tests and the `--config-dir` /
/// `--data-dir` flags isolate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScoutPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl SiteScoutPaths {
    /// Resolves platform defaults for any directory not overridden.
    pub fn resolve(config_dir: Option<&Path>, data_dir: Option<&Path>) -> Result<Self, PathError> {
        let config_dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::HomeDirNotFound)?
                .join(APP_DIR_NAME),
        };
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()
                .ok_or(PathError::HomeDirNotFound)?
                .join(APP_DIR_NAME),
        };
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Uses one root for both config and data (tests).
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to `config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Path to `secret.json`.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file(&self) -> PathBuf {
        self.config_dir.join("secret.json")
    }

    /// Directory backing the key-value store.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}
