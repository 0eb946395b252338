use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::error::{ForumError, Result};
use crate::store::{StoreClient, DEFAULT_ENDPOINT};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_username: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user config dir. See [`Config::load_or_default`].
    pub fn load() -> (Self, Option<PathBuf>) {
        match Self::default_path() {
            Ok(path) => Self::load_or_default(path),
            Err(e) => {
                warn!(error = %e, "using default config");
                (Self::new(), None)
            }
        }
    }

    /// Load `path`, falling back to defaults when it can't be read or parsed.
    /// The path is handed back only when it is safe to save over: a file we
    /// failed to parse is left alone.
    pub fn load_or_default(path: PathBuf) -> (Self, Option<PathBuf>) {
        match Self::load_from(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using default config, file will not be saved");
                (Self::new(), None)
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Record the username of the last successful send. Returns true if it
    /// changed and the config needs saving.
    pub fn remember_username(&mut self, username: &str) -> bool {
        if self.default_username.as_deref() == Some(username) {
            return false;
        }
        self.default_username = Some(username.to_string());
        true
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn store_client(&self) -> Result<StoreClient> {
        match self.request_timeout() {
            Some(timeout) => StoreClient::with_timeout(self.endpoint(), timeout),
            None => Ok(StoreClient::new(self.endpoint())),
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ForumError::Config("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("hacker-forum").join("config.json"))
    }
}
