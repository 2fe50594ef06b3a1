//! Persisted token storage.
//!
//! The session's token pair is persisted as two fixed keys (`access`,
//! `refresh`) in a JSON file under the gridbase config directory. An
//! absent file, or absent keys, means "logged out".

use crate::paths::GridbasePaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// The access/refresh token pair for an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer token attached to every request
    pub access: String,
    /// Long-lived token exchanged for a new access token
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Errors that can occur during token storage operations.
#[derive(Error, Debug)]
pub enum TokenStoreError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    /// Config directory not found.
    #[error("Could not determine config directory")]
    ConfigDirNotFound,
}

impl From<TokenStoreError> for gridbase_core::GridbaseError {
    fn from(err: TokenStoreError) -> Self {
        match err {
            TokenStoreError::IoError(e) => Self::io(e.to_string()),
            TokenStoreError::ParseError(e) => Self::Serialization {
                format: "JSON".to_string(),
                message: e.to_string(),
            },
            TokenStoreError::ConfigDirNotFound => Self::config("Could not determine config directory"),
        }
    }
}

/// Abstract storage for the session token pair.
///
/// Exactly one writer exists per running client (the session manager);
/// implementations only need to be durable, not coordinated.
pub trait TokenStore: Send + Sync {
    /// Loads the persisted pair, `None` meaning logged out.
    fn load(&self) -> Result<Option<TokenPair>, TokenStoreError>;

    /// Persists the pair.
    fn save(&self, pair: &TokenPair) -> Result<(), TokenStoreError>;

    /// Removes any persisted pair.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// On-disk JSON payload; both keys optional so a partially written file
/// degrades to "logged out" rather than an error.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
}

/// Token storage backed by `~/.config/gridbase/tokens.json`.
///
/// # Security Note
///
/// The file is created with mode 600 (user read/write only) on Unix.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at the default token file path.
    pub fn new() -> Result<Self, TokenStoreError> {
        let path = GridbasePaths::token_file().map_err(|_| TokenStoreError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path to the token file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let stored: StoredTokens = serde_json::from_str(&content)?;
        match (stored.access, stored.refresh) {
            (Some(access), Some(refresh)) => Ok(Some(TokenPair { access, refresh })),
            _ => Ok(None),
        }
    }

    fn save(&self, pair: &TokenPair) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredTokens {
            access: Some(pair.access.clone()),
            refresh: Some(pair.refresh.clone()),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, permissions)?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory token storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    pair: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        Ok(self.pair.lock().expect("token store poisoned").clone())
    }

    fn save(&self, pair: &TokenPair) -> Result<(), TokenStoreError> {
        *self.pair.lock().expect("token store poisoned") = Some(pair.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.pair.lock().expect("token store poisoned") = None;
        Ok(())
    }
}
