//! Navigator property reform.
//!
//! This module makes a derived [`Projection`](crate::signature::Projection)
//! override the page's view of `navigator`, even though the properties
//! involved are normally read-only getters owned by the browser engine.
//!
//! # Modules
//!
//! - `target` - Explicit host-object model; the engine never touches ambient globals
//! - `engine` - Table-driven accessor installation with per-property failure isolation
//! - `bridge` - Projection memoization and the privileged-to-page serialization contract
//!
//! # Example
//!
//! ```rust
//! use antiprint::reform::{install, navigator_property_specs, never_disabled, HostObject,
//!     PropertyAttributes, ProjectionBridge};
//! use serde_json::json;
//!
//! let navigator = HostObject::new();
//! navigator.seed_data("platform", Some(json!("Linux x86_64")), PropertyAttributes::default());
//! navigator.seed_data("webdriver", Some(json!(true)), PropertyAttributes::default());
//!
//! let bridge = ProjectionBridge::new(
//!     "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:56.0) Gecko/20100101 Firefox/56.0",
//! );
//! let report = install(&navigator, &navigator_property_specs(), bridge.projection(), never_disabled());
//!
//! assert!(report.is_complete());
//! assert_eq!(navigator.get("webdriver"), None);
//! ```

pub mod bridge;
pub mod engine;
pub mod target;

// Re-export commonly used types for convenience
pub use bridge::{
    reform_page, render_apply_script, PageRealmInjector, ProjectionBridge, APPLY_ROUTINE_VERSION,
    SETTINGS_OBJECT,
};
pub use engine::{
    install, navigator_property_specs, never_disabled, DisableFlag, InstallReport, OverrideMode,
    Projector, PropertySpec,
};
pub use target::{Getter, HostObject, PropertyAttributes};

use thiserror::Error;

/// Errors raised while reforming a page's navigator.
#[derive(Debug, Error)]
pub enum ReformError {
    /// The host object model refused to redefine a property. Recovered
    /// locally by the engine: logged, skipped, remaining properties proceed.
    #[error("property `{0}` is not configurable")]
    NotConfigurable(String),

    /// The host-specific realm injector could not deliver the apply script.
    #[error("page realm injection failed: {0}")]
    Injection(String),
}
