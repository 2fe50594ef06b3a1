//! Unified path management for gridbase client files.
//!
//! Tokens and configuration live under the platform config directory
//! (e.g. `~/.config/gridbase/` on Linux).

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during path resolution.
#[derive(Error, Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

/// Unified path management for gridbase.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/gridbase/          # Config directory
/// ├── config.toml              # Client configuration (base URL, timeout)
/// └── tokens.json              # Access/refresh token pair (mode 600)
/// ```
pub struct GridbasePaths;

impl GridbasePaths {
    /// Returns the gridbase configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("gridbase"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted token file.
    ///
    /// # Security Note
    ///
    /// The token file is written with mode 600 on Unix; see
    /// [`crate::storage::FileTokenStore`].
    pub fn token_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("tokens.json"))
    }
}
