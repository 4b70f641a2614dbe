//! Persistent sign-in credentials.
//!
//! Credentials live in their own JSON file rather than config.toml so
//! the secret material can carry tighter file permissions.

use std::path::{Path, PathBuf};

use codebin_core::auth::Identity;
use codebin_core::error::Result;
use serde::{Deserialize, Serialize};

use crate::storage::JsonStore;

/// Contents of credentials.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    pub user_email: String,
    pub api_token: String,
    /// Key for the generative API used by the converter and the chat
    /// assistant. Optional: everything else works without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generative_api_key: Option<String>,
}

impl StoredCredentials {
    /// Returns the signed-in identity, or `None` when the stored
    /// credentials are blank (e.g. a freshly written template).
    pub fn identity(&self) -> Option<Identity> {
        if self.user_email.is_empty() || self.api_token.is_empty() {
            return None;
        }
        Some(Identity::new(&self.user_email, &self.api_token))
    }
}

impl Default for StoredCredentials {
    fn default() -> Self {
        Self {
            user_email: String::new(),
            api_token: String::new(),
            generative_api_key: None,
        }
    }
}

/// Reads and writes the credentials file.
pub struct CredentialsStore {
    store: JsonStore,
}

impl CredentialsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }

    /// Ensures the credentials file exists, creating a blank template
    /// if it doesn't.
    ///
    /// Sets file permissions to 600 (user read/write only) on Unix so
    /// the token and generative API key are not world-readable.
    pub fn ensure_template(&self) -> Result<PathBuf> {
        let path = self.store.path().to_path_buf();
        if path.exists() {
            return Ok(path);
        }

        self.save(&StoredCredentials::default())?;
        Ok(path)
    }

    /// Loads stored credentials. Returns `None` if the file does not
    /// exist yet.
    pub fn load(&self) -> Result<Option<StoredCredentials>> {
        self.store.load()
    }

    /// Writes credentials and restricts the file to the current user.
    pub fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        self.store.save(credentials)?;
        restrict_permissions(self.store.path())
    }

    /// Deletes the credentials file. Missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(self.store.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let permissions = std::fs::Permissions::from_mode(0o600);
    std::fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
