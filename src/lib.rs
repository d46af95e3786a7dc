//! # Antiprint
//!
//! A browser fingerprinting countermeasure library written in Rust.
//!
//! Antiprint rewrites a page's reported platform-identifying navigator
//! properties (`platform`, `oscpu`, `buildID`, `appVersion`, `webdriver`)
//! so a site cannot detect a mismatch between the browser's real operating
//! system/CPU and the value it advertises, and separately constrains
//! WebRTC's ICE candidate gathering so it cannot leak the user's real
//! local or public IP.
//!
//! ## Features
//!
//! - **Signature Projection**: deterministic derivation of a self-consistent
//!   navigator property set from a raw user-agent string
//! - **Property Override Engine**: table-driven accessor installation with
//!   per-property failure isolation and a runtime disable switch
//! - **Privileged-to-Page Bridge**: serialization contract for applying a
//!   projection inside the page's own JavaScript realm
//! - **WebRTC Policy Enforcement**: one-shot startup tightening of the
//!   IP-handling policy
//! - **Flexible Configuration**: TOML/JSON files, environment variables,
//!   CLI arguments
//!
//! ## Quick Start
//!
//! ```rust
//! use antiprint::reform::{install, navigator_property_specs, never_disabled, HostObject,
//!     ProjectionBridge, PropertyAttributes};
//! use serde_json::json;
//!
//! // The object the page would see, modeled explicitly.
//! let navigator = HostObject::new();
//! navigator.seed_data("platform", Some(json!("Linux x86_64")), PropertyAttributes::default());
//! navigator.seed_data("webdriver", Some(json!(true)), PropertyAttributes::default());
//!
//! // Derive once per page-load, then install the overrides.
//! let bridge = ProjectionBridge::new(
//!     "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:56.0) Gecko/20100101 Firefox/56.0",
//! );
//! let report = install(&navigator, &navigator_property_specs(), bridge.projection(), never_disabled());
//!
//! assert!(report.is_complete());
//! assert_eq!(navigator.get("webdriver"), None);
//! ```
//!
//! ## Module Overview
//!
//! - [`signature`]: user-agent parsing and projection derivation
//! - [`reform`]: host-object model, override engine, page-realm bridge
//! - [`webrtc`]: IP-handling policy inspection and enforcement
//! - [`config`]: settings loading and the disable-switch capability

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Module Exports
// ============================================================================

/// Configuration management for loading settings from files and environment.
pub mod config;

/// User-agent signature parsing and navigator projection derivation.
pub mod signature;

/// Property override engine and privileged-to-page bridge.
pub mod reform;

/// WebRTC IP-handling policy enforcement.
pub mod webrtc;

// ============================================================================
// Re-exports for Convenience
// ============================================================================

pub use config::{AntiprintSettings, ConfigError};
pub use reform::{
    install, navigator_property_specs, reform_page, HostObject, InstallReport, OverrideMode,
    PageRealmInjector, ProjectionBridge, PropertySpec, ReformError,
};
pub use signature::{
    NavigatorProjection, Projection, SignatureCrafter, UaParser, UaSignature, UserAgentParser,
};
pub use webrtc::{
    enforce_safe_policy, FilePolicyStore, IpHandlingPolicy, PolicyEnforcement, PrivacyNetwork,
    WebRtcError, SAFE_POLICY,
};

// ============================================================================
// Prelude Module
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust
/// use antiprint::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::AntiprintSettings;
    pub use crate::reform::{
        install, navigator_property_specs, never_disabled, HostObject, ProjectionBridge,
    };
    pub use crate::signature::{Projection, SignatureCrafter};
    pub use crate::webrtc::{enforce_safe_policy, IpHandlingPolicy, PrivacyNetwork};
    pub use crate::{FULL_VERSION, NAME, VERSION};
}
