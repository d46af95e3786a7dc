//! WebRTC IP-handling policy enforcement.
//!
//! WebRTC's ICE negotiation may enumerate local network interfaces and hand
//! the resulting candidate addresses to the page, leaking the user's real
//! local (and, behind a proxy, public) IP. The browser exposes a privacy
//! setting that constrains candidate gathering; this module inspects that
//! setting once at startup and tightens it when it currently exposes the
//! local network path.
//!
//! The privacy API itself is host-owned and reached through the
//! [`PrivacyNetwork`] seam. A host without the API is a hard configuration
//! error: silently continuing unprotected is exactly the leak this
//! component exists to prevent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by the WebRTC policy component.
#[derive(Debug, Error)]
pub enum WebRtcError {
    /// The host lacks the IP-handling policy API. Fatal to this component;
    /// must be surfaced, never swallowed.
    #[error("host does not support the IP handling policy API ({0})")]
    Unsupported(String),

    /// A policy string did not match any known value.
    #[error("unknown IP handling policy `{0}`")]
    UnknownPolicy(String),

    /// The policy store could not be read or written.
    #[error("failed to access policy store")]
    Store(#[from] std::io::Error),

    /// The policy store contents could not be decoded.
    #[error("malformed policy store")]
    Malformed(#[from] serde_json::Error),
}

/// Browser setting controlling which network interfaces ICE may expose.
///
/// Wire names match the browser's policy strings exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpHandlingPolicy {
    /// No restriction: all interfaces, local candidates included.
    Default,
    /// Public and private interfaces both exposed.
    DefaultPublicAndPrivateInterfaces,
    /// Only the default public interface; local addresses stay hidden.
    DefaultPublicInterfaceOnly,
    /// Media forced through the same network path as normal web traffic,
    /// including any configured proxy.
    DisableNonProxiedUdp,
}

/// The policy enforcement tightens to: non-proxied UDP disabled, so WebRTC
/// traffic follows the same (possibly proxied) path as everything else.
pub const SAFE_POLICY: IpHandlingPolicy = IpHandlingPolicy::DisableNonProxiedUdp;

impl IpHandlingPolicy {
    /// Whether this policy lets ICE candidates reveal the real local or
    /// public IP.
    pub fn exposes_local_ip(self) -> bool {
        matches!(
            self,
            IpHandlingPolicy::Default | IpHandlingPolicy::DefaultPublicAndPrivateInterfaces
        )
    }

    /// The browser's wire name for this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            IpHandlingPolicy::Default => "default",
            IpHandlingPolicy::DefaultPublicAndPrivateInterfaces => {
                "default_public_and_private_interfaces"
            }
            IpHandlingPolicy::DefaultPublicInterfaceOnly => "default_public_interface_only",
            IpHandlingPolicy::DisableNonProxiedUdp => "disable_non_proxied_udp",
        }
    }
}

impl std::fmt::Display for IpHandlingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IpHandlingPolicy {
    type Err = WebRtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(IpHandlingPolicy::Default),
            "default_public_and_private_interfaces" => {
                Ok(IpHandlingPolicy::DefaultPublicAndPrivateInterfaces)
            }
            "default_public_interface_only" => Ok(IpHandlingPolicy::DefaultPublicInterfaceOnly),
            "disable_non_proxied_udp" => Ok(IpHandlingPolicy::DisableNonProxiedUdp),
            other => Err(WebRtcError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Seam over the host's privacy-network API.
///
/// Both calls are async because the browser's privacy API completes via
/// callback or promise; there is no ordering dependency on the navigator
/// override path.
#[async_trait]
pub trait PrivacyNetwork: Send + Sync {
    /// Reads the current IP-handling policy.
    async fn ip_handling_policy(&self) -> Result<IpHandlingPolicy, WebRtcError>;

    /// Writes a new IP-handling policy. A failure here must propagate to
    /// the caller; absorbing it silently leaves the leak open.
    async fn set_ip_handling_policy(&self, policy: IpHandlingPolicy) -> Result<(), WebRtcError>;
}

/// Outcome of one enforcement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyEnforcement {
    /// The current policy already hides the local network path; no write
    /// was issued.
    AlreadyRestrictive(IpHandlingPolicy),
    /// The policy was tightened to [`SAFE_POLICY`].
    Tightened {
        /// The leaking policy that was replaced.
        previous: IpHandlingPolicy,
    },
}

/// One-shot startup enforcement: read the policy, tighten it if it exposes
/// the real IP, leave it alone otherwise (idempotent, no redundant writes).
pub async fn enforce_safe_policy(
    network: &dyn PrivacyNetwork,
) -> Result<PolicyEnforcement, WebRtcError> {
    let current = network.ip_handling_policy().await?;
    if current.exposes_local_ip() {
        network.set_ip_handling_policy(SAFE_POLICY).await?;
        info!(previous = %current, policy = %SAFE_POLICY, "tightened WebRTC IP handling policy");
        Ok(PolicyEnforcement::Tightened { previous: current })
    } else {
        debug!(policy = %current, "WebRTC IP handling policy already restrictive");
        Ok(PolicyEnforcement::AlreadyRestrictive(current))
    }
}
