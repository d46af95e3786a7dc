//! Antiprint settings and configuration management.
//!
//! Settings drive the diagnostic binary and materialize the page-visible
//! disable switch consulted by installed override getters.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reform::DisableFlag;

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Unsupported file format.
    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

/// Main antiprint configuration.
///
/// # Configuration Precedence
///
/// Settings are applied in the following order (later sources override earlier):
/// 1. Default values
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables (`ANTIPRINT_*`)
/// 4. CLI arguments
///
/// # Example
///
/// ```rust
/// use antiprint::config::AntiprintSettings;
///
/// let settings = AntiprintSettings::default()
///     .with_user_agent("Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:56.0) Gecko/20100101 Firefox/56.0");
/// assert!(!settings.disabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntiprintSettings {
    /// Page-visible disable switch: when true, overridden navigator reads
    /// fall back to the original values without reinstalling anything.
    #[serde(default)]
    pub disabled: bool,

    /// User-agent string to derive the projection from. The live browser
    /// supplies its own; the diagnostic binary needs one configured or
    /// passed on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Run the one-shot WebRTC policy enforcement at startup.
    #[serde(default = "default_enforce_webrtc_policy")]
    pub enforce_webrtc_policy: bool,

    /// Backing file for the JSON policy store used by the binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_store: Option<PathBuf>,
}

fn default_enforce_webrtc_policy() -> bool {
    true
}

impl Default for AntiprintSettings {
    fn default() -> Self {
        Self {
            disabled: false,
            user_agent: None,
            enforce_webrtc_policy: default_enforce_webrtc_policy(),
            policy_store: None,
        }
    }
}

impl AntiprintSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a configuration file.
    ///
    /// Supports both TOML and JSON formats, detected by file extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Ok(toml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            ext => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Applies `ANTIPRINT_*` environment variable overrides and returns the
    /// merged settings.
    ///
    /// Recognized variables:
    /// - `ANTIPRINT_DISABLED`
    /// - `ANTIPRINT_USER_AGENT`
    /// - `ANTIPRINT_ENFORCE_WEBRTC_POLICY`
    /// - `ANTIPRINT_POLICY_STORE`
    pub fn merge_with_env(mut self) -> Self {
        if let Ok(val) = env::var("ANTIPRINT_DISABLED") {
            if let Ok(disabled) = val.parse() {
                self.disabled = disabled;
            }
        }

        if let Ok(val) = env::var("ANTIPRINT_USER_AGENT") {
            if !val.is_empty() {
                self.user_agent = Some(val);
            }
        }

        if let Ok(val) = env::var("ANTIPRINT_ENFORCE_WEBRTC_POLICY") {
            if let Ok(enforce) = val.parse() {
                self.enforce_webrtc_policy = enforce;
            }
        }

        if let Ok(val) = env::var("ANTIPRINT_POLICY_STORE") {
            if !val.is_empty() {
                self.policy_store = Some(PathBuf::from(val));
            }
        }

        self
    }

    /// Sets the disable switch.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the user-agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enables or disables startup WebRTC policy enforcement.
    pub fn with_enforce_webrtc_policy(mut self, enforce: bool) -> Self {
        self.enforce_webrtc_policy = enforce;
        self
    }

    /// Sets the policy store path.
    pub fn with_policy_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.policy_store = Some(path.into());
        self
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ua) = &self.user_agent {
            if ua.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "user_agent must not be blank".to_string(),
                ));
            }
        }
        if self.enforce_webrtc_policy && self.policy_store.is_none() {
            return Err(ConfigError::ValidationError(
                "enforce_webrtc_policy requires policy_store to be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Materializes the disable switch as the capability the override
    /// engine consumes. The returned flag snapshots this settings value;
    /// a live surface would hand out a flag backed by its own state.
    pub fn disable_flag(&self) -> DisableFlag {
        let disabled = self.disabled;
        std::sync::Arc::new(move || disabled)
    }
}
