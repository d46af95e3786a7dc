//! WebRTC local-IP leak protection.
//!
//! Independent of the navigator reform path: runs once at startup, inspects
//! the browser's WebRTC IP-handling policy through the [`PrivacyNetwork`]
//! seam, and tightens it when the current value exposes the real local or
//! public IP.
//!
//! # Example
//!
//! ```rust,no_run
//! use antiprint::webrtc::{enforce_safe_policy, FilePolicyStore};
//!
//! # async fn run() -> Result<(), antiprint::webrtc::WebRtcError> {
//! let store = FilePolicyStore::open("policy.json").await?;
//! let outcome = enforce_safe_policy(&store).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod policy;
pub mod store;

// Re-export commonly used types for convenience
pub use policy::{
    enforce_safe_policy, IpHandlingPolicy, PolicyEnforcement, PrivacyNetwork, WebRtcError,
    SAFE_POLICY,
};
pub use store::FilePolicyStore;
