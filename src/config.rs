use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

/// Backend location and the fixed library owner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            user_id: "default-user".to_string(),
        }
    }
}

/// Timing of the notification and modal chrome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long a notification stays fully visible
    pub notification_visible_ms: u64,
    /// Slide-out animation before the notification is removed
    pub notification_exit_ms: u64,
    /// Wait after closing the modal before the library listing is shown again
    pub rerender_delay_ms: u64,
    /// Characters of review text shown on a community card
    pub preview_chars: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_visible_ms: 3000,
            notification_exit_ms: 300,
            rerender_delay_ms: 300,
            preview_chars: 100,
        }
    }
}

impl UiConfig {
    pub fn rerender_delay(&self) -> Duration {
        Duration::from_millis(self.rerender_delay_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Load configuration from the default location (.nexo/config.yml)
    pub fn load_default() -> Result<Self> {
        Self::load(".nexo/config.yml")
    }

    /// Apply `NEXO_API_URL` and `NEXO_USER_ID` on top of the file values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("NEXO_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(user) = std::env::var("NEXO_USER_ID") {
            self.api.user_id = user;
        }
        self
    }
}
