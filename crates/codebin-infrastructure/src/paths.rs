//! Unified path management for codebin's on-device files.
//!
//! Every locally persisted artifact (configuration, credentials, draft
//! buffers, cached listings, chat history) resolves its location here, so
//! the layout stays consistent across platforms (Linux, macOS, Windows).

use std::path::PathBuf;

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

/// Unified path management for codebin.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/codebin/           # Config directory
/// ├── config.toml              # Backend endpoints and model selection
/// └── credentials.json         # Caller identity and API keys (0600)
///
/// ~/.local/share/codebin/      # Data directory
/// ├── drafts.json              # Per-language unsaved buffers
/// ├── catalog.json             # Cached remote file listing
/// └── chats.json               # AI chat history
/// ```
pub struct CodebinPaths;

impl CodebinPaths {
    /// Returns the codebin configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/codebin/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("codebin"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the codebin data directory, used for the local caches.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("codebin"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the credentials file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn credentials_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("credentials.json"))
    }

    /// Returns the path to the per-language draft store.
    pub fn drafts_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("drafts.json"))
    }

    /// Returns the path to the cached file listing.
    pub fn catalog_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("catalog.json"))
    }

    /// Returns the path to the chat history store.
    pub fn chats_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("chats.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = CodebinPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("codebin"));
    }

    #[test]
    fn test_config_file() {
        let config_file = CodebinPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = CodebinPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_credentials_file() {
        let credentials_file = CodebinPaths::credentials_file().unwrap();
        assert!(credentials_file.ends_with("credentials.json"));
        let config_dir = CodebinPaths::config_dir().unwrap();
        assert!(credentials_file.starts_with(&config_dir));
    }

    #[test]
    fn test_data_files_live_under_data_dir() {
        let data_dir = CodebinPaths::data_dir().unwrap();
        assert!(CodebinPaths::drafts_file().unwrap().starts_with(&data_dir));
        assert!(CodebinPaths::catalog_file().unwrap().starts_with(&data_dir));
        assert!(CodebinPaths::chats_file().unwrap().starts_with(&data_dir));
    }
}
