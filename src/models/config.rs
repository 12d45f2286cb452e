//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Feed pagination settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Device capability helper settings
    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| AppError::validation(format!("api.base_url is not a valid URL: {e}")))?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.feed.page_size == 0 {
            return Err(AppError::validation("feed.page_size must be > 0"));
        }
        if self.device.helper_timeout_secs == 0 {
            return Err(AppError::validation(
                "device.helper_timeout_secs must be > 0",
            ));
        }
        Ok(())
    }
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the platform API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; no other timeout is enforced client-side
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Feed pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Items requested per page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
        }
    }
}

/// Device capability helper settings.
///
/// Headless hosts acquire coordinates and photos through external helper
/// commands; both are optional and the corresponding modes are simply
/// unavailable when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Command printing the current position as JSON on stdout
    #[serde(default)]
    pub location_command: Option<String>,

    /// Command capturing a photo to the path given as its argument
    #[serde(default)]
    pub camera_command: Option<String>,

    /// Timeout applied to helper command runs, in seconds
    #[serde(default = "defaults::helper_timeout")]
    pub helper_timeout_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            location_command: None,
            camera_command: None,
            helper_timeout_secs: defaults::helper_timeout(),
        }
    }
}

mod defaults {
    // API defaults
    pub fn base_url() -> String {
        "https://api.afiliado.example".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; afiliado/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Feed defaults
    pub fn page_size() -> u32 {
        10
    }

    // Device defaults
    pub fn helper_timeout() -> u64 {
        15
    }
}
