//! Configuration module for antiprint.
//!
//! This module provides configuration management for the spoofing engine,
//! including:
//! - Loading settings from files (TOML/JSON)
//! - Environment variable overrides (`ANTIPRINT_*`)
//! - Validation and defaults
//! - Materializing the page-visible disable switch as an injected capability
//!
//! # Example
//!
//! ```rust,no_run
//! use antiprint::config::AntiprintSettings;
//!
//! // Load from a specific file, then apply environment overrides
//! let settings = AntiprintSettings::from_file("antiprint.toml")
//!     .unwrap()
//!     .merge_with_env();
//! ```

mod settings;

pub use settings::{AntiprintSettings, ConfigError};
