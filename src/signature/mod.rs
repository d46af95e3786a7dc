//! User-agent signature parsing and navigator projection derivation.
//!
//! This module is the algorithmic core of antiprint. A raw user-agent string
//! is parsed into a structured [`UaSignature`], and from that signature a
//! [`Projection`] is derived: the self-consistent set of navigator property
//! values that page scripts are allowed to observe.
//!
//! # Modules
//!
//! - `parser` - User-agent string classification behind the [`UserAgentParser`] seam
//! - `crafter` - Deterministic projection derivation from a parsed signature
//!
//! # Example
//!
//! ```rust
//! use antiprint::signature::SignatureCrafter;
//!
//! let crafter = SignatureCrafter::new();
//! let projection = crafter.derive(
//!     "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:56.0) Gecko/20100101 Firefox/56.0",
//! );
//!
//! assert_eq!(projection.navigator.platform, "Linux x86_64");
//! assert_eq!(projection.navigator.app_version, "5.0 (X11)");
//! ```

pub mod crafter;
pub mod parser;

// Re-export commonly used types for convenience
pub use crafter::{
    construct_platform, map_arch, map_os_name, NavigatorProjection, Projection, SignatureCrafter,
    KNOWN_LINUXEN,
};
pub use parser::{BrowserInfo, CpuInfo, OsInfo, UaParser, UaSignature, UserAgentParser};
