//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\photofan\config.toml
//! - macOS: ~/Library/Application Support/photofan/config.toml
//! - Linux: ~/.config/photofan/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded
//! once at startup; nothing in this crate writes to it during a query.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::credentials::{Credential, CredentialProvider};
use crate::domain::Service;

/// Crate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (kept separate for potential future encryption)
    pub credentials: CredentialsConfig,

    /// Network behavior of the fan-out executor
    pub network: NetworkConfig,
}

/// API credentials, one optional pair per service.
///
/// Doubles as a ready-made [`CredentialProvider`] for callers that keep
/// their tokens in the config file rather than on their own user type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Flickr API key (get one at https://www.flickr.com/services/apps/create/)
    pub flickr_api_key: Option<String>,
    /// Flickr account NSID, e.g. "12345678@N00"
    pub flickr_user_id: Option<String>,
    /// Facebook Graph API access token
    pub facebook_access_token: Option<String>,
    /// Facebook user id; omitted means "me"
    pub facebook_user_id: Option<String>,
}

impl CredentialProvider for CredentialsConfig {
    fn credential_for(&self, service: Service) -> Option<Credential> {
        match service {
            Service::Flickr => self.flickr_api_key.as_ref().map(|key| Credential {
                user_id: self.flickr_user_id.clone(),
                token: Some(key.clone()),
            }),
            Service::Facebook => self.facebook_access_token.as_ref().map(|token| Credential {
                user_id: self.facebook_user_id.clone(),
                token: Some(token.clone()),
            }),
        }
    }
}

/// Network settings for the fan-out executor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Upper bound on requests in flight during one query
    pub max_concurrent_requests: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_concurrent_requests: 10,
        }
    }
}

impl NetworkConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photofan"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
