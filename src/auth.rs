//! Local credential storage
//!
//! Keeps the bearer token from the last login between invocations. The backend
//! owns token issuance and validation; this only remembers the string.

use crate::error::ApiError;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const TOKEN_FILE: &str = "auth.json";

/// Credentials remembered from the last login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub access_token: String,
    #[serde(default)]
    pub email: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl StoredCredentials {
    pub fn new(access_token: impl Into<String>, email: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            email,
            saved_at: Utc::now(),
        }
    }
}

/// File-backed token store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory (`$XDG_DATA_HOME/tripgen` on Linux).
    pub fn default_location() -> Result<Self, ApiError> {
        let dirs = ProjectDirs::from("", "", "tripgen").ok_or_else(|| {
            ApiError::TokenStore("Could not determine the user data directory".to_string())
        })?;
        Ok(Self::new(dirs.data_dir().join(TOKEN_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<StoredCredentials>, ApiError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let credentials = serde_json::from_str(&raw).map_err(|e| {
            ApiError::TokenStore(format!("Corrupt token file {}: {}", self.path.display(), e))
        })?;
        Ok(Some(credentials))
    }

    pub fn save(&self, credentials: &StoredCredentials) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(credentials)
            .map_err(|e| ApiError::TokenStore(format!("Failed to encode credentials: {}", e)))?;
        std::fs::write(&self.path, raw)?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "Saved credentials");
        Ok(())
    }

    /// Forget stored credentials. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool, ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared credentials");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), ApiError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), ApiError> {
    Ok(())
}
