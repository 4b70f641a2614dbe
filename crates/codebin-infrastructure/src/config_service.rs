//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the application
//! configuration from the configuration file
//! (~/.config/codebin/config.toml).

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use codebin_core::error::Result;
use serde::{Deserialize, Serialize};

/// Application configuration loaded from config.toml.
///
/// Missing keys fall back to their defaults, so a partial file (or no
/// file at all) still yields a working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the compile-and-store backend.
    pub backend_url: String,
    /// Model identifier used for code conversion and chat.
    pub generative_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "https://backendforcodecompiler.onrender.com".to_string(),
            generative_model: "gemini-2.0-flash".to_string(),
        }
    }
}

/// Configuration service that loads and caches the application
/// configuration.
///
/// The file is read once and cached to avoid repeated I/O; a missing
/// file is created with defaults so users have something to edit.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Creates a new ConfigService reading from the given file.
    ///
    /// The configuration is loaded lazily on first access to avoid
    /// blocking during initialization.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    pub fn get_config(&self) -> AppConfig {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_default();

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    /// Loads AppConfig from the config file, writing the defaults
    /// first if the file does not exist yet.
    fn load_config(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            let default_config = AppConfig::default();
            self.write_config(&default_config)?;
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn write_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Atomic write: temp file then rename.
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("config.toml");
        let temp_path = self.path.with_file_name(format!(".{}.tmp", file_name));

        std::fs::write(&temp_path, toml::to_string_pretty(config)?)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}
