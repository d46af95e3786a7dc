//! Deterministic navigator projection derivation.
//!
//! [`SignatureCrafter::derive`] maps a raw user-agent string to the full set
//! of navigator property values the page is allowed to see. The derivation
//! is a pure function of the user-agent string: the same input always yields
//! a bit-identical [`Projection`]. Anything else would let a site observe an
//! incoherent fingerprint across repeated reads within one page-load.
//!
//! # Example
//!
//! ```rust
//! use antiprint::signature::SignatureCrafter;
//!
//! let crafter = SignatureCrafter::new();
//! let projection = crafter.derive(
//!     "Mozilla/5.0 (Windows NT 6.3; Win64; x64) AppleWebKit/537.36 \
//!      (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
//! );
//!
//! assert_eq!(projection.navigator.platform, "Win32");
//! assert_eq!(projection.navigator.oscpu, "");
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::signature::parser::{UaParser, UaSignature, UserAgentParser};

/// Linux distribution names that are canonicalized to plain "Linux".
///
/// A real Firefox on Ubuntu reports `navigator.platform` as "Linux x86_64",
/// not "Ubuntu x86_64"; projecting the distribution name would itself be a
/// fingerprintable mismatch.
pub const KNOWN_LINUXEN: &[&str] = &["Ubuntu", "Debian"];

/// The navigator property values exposed to page scripts.
///
/// Field names serialize as the page-visible property names so the struct
/// can cross the privileged-to-page boundary as a plain JSON payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorProjection {
    /// Spoofed `navigator.platform` (e.g., "Win32", "MacIntel", "Linux x86_64").
    pub platform: String,

    /// Spoofed `navigator.appVersion`; empty for browser families that do
    /// not expose a meaningful value.
    #[serde(rename = "appVersion")]
    pub app_version: String,

    /// Always empty: `navigator.oscpu` leaks the OS/CPU verbatim on Gecko.
    pub oscpu: String,

    /// Always empty: `navigator.buildID` leaks the engine build date.
    #[serde(rename = "buildID")]
    pub build_id: String,
}

/// A derived projection, immutable once constructed.
///
/// Wraps [`NavigatorProjection`] under a `navigator` key so the serialized
/// payload is namespaced by target object; has page-load lifetime and is
/// recomputed fresh on each navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub navigator: NavigatorProjection,
}

/// Canonicalizes a parsed OS name.
///
/// Members of [`KNOWN_LINUXEN`] become "Linux"; everything else (including
/// the empty string) passes through verbatim.
pub fn map_os_name(os_name: &str) -> String {
    if KNOWN_LINUXEN.contains(&os_name) {
        "Linux".to_string()
    } else {
        os_name.to_string()
    }
}

/// Rewrites a CPU architecture token for a given normalized OS.
///
/// Linux spells 64-bit x86 as "x86_64"; every other OS keeps the parser's
/// canonical token unchanged.
pub fn map_arch(arch: &str, os_name: &str) -> String {
    if os_name == "Linux" && arch == "amd64" {
        "x86_64".to_string()
    } else {
        arch.to_string()
    }
}

/// Computes the spoofed `navigator.platform` value for a signature.
///
/// An empty OS name falls into the default branch and yields a platform
/// string with a leading space. That quirk is reproducible and pinned by
/// tests; do not "fix" it.
pub fn construct_platform(signature: &UaSignature) -> String {
    let os_name = map_os_name(&signature.os.name);
    match os_name.as_str() {
        "Windows" => "Win32".to_string(),
        "Mac OS" => "MacIntel".to_string(),
        _ => format!(
            "{} {}",
            os_name,
            map_arch(&signature.cpu.architecture, &os_name)
        ),
    }
}

/// Derives navigator projections from raw user-agent strings.
///
/// Holds the [`UserAgentParser`] seam; the default constructor wires in the
/// bundled [`UaParser`].
#[derive(Clone)]
pub struct SignatureCrafter {
    parser: Arc<dyn UserAgentParser>,
}

impl SignatureCrafter {
    /// Creates a crafter using the bundled substring parser.
    pub fn new() -> Self {
        Self {
            parser: Arc::new(UaParser::new()),
        }
    }

    /// Creates a crafter with a custom parser implementation.
    pub fn with_parser(parser: Arc<dyn UserAgentParser>) -> Self {
        Self { parser }
    }

    /// Derives the full projection for a raw user-agent string.
    pub fn derive(&self, user_agent: &str) -> Projection {
        let signature = self.parser.parse(user_agent);
        Projection {
            navigator: NavigatorProjection {
                platform: construct_platform(&signature),
                app_version: construct_app_version(&signature, user_agent),
                oscpu: String::new(),
                build_id: String::new(),
            },
        }
    }
}

impl Default for SignatureCrafter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignatureCrafter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureCrafter").finish_non_exhaustive()
    }
}

/// Computes the spoofed `navigator.appVersion` by browser family.
fn construct_app_version(signature: &UaSignature, user_agent: &str) -> String {
    match signature.browser.name.as_str() {
        // Blink reports the user agent minus the "Mozilla/" prefix.
        "Chrome" | "Chromium" => user_agent
            .strip_prefix("Mozilla/")
            .unwrap_or(user_agent)
            .to_string(),
        "Firefox" => firefox_app_version(signature, user_agent),
        _ => String::new(),
    }
}

/// Gecko reports `appVersion` as "<mozillaVersion> (<parenthetical>)" where
/// the parenthetical names the windowing system, not the full OS string.
fn firefox_app_version(signature: &UaSignature, user_agent: &str) -> String {
    let parenthetical = match map_os_name(&signature.os.name).as_str() {
        "Mac OS" => Some("Macintosh"),
        "Linux" => Some("X11"),
        "Windows" => Some("Windows"),
        _ => None,
    };
    match (mozilla_version(user_agent), parenthetical) {
        (Some(version), Some(parenthetical)) => format!("{} ({})", version, parenthetical),
        _ => String::new(),
    }
}

/// Extracts the major.minor version from a leading `Mozilla/<d>.<d>` token.
fn mozilla_version(user_agent: &str) -> Option<String> {
    let rest = user_agent.strip_prefix("Mozilla/")?;
    let major_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if major_len == 0 || !rest[major_len..].starts_with('.') {
        return None;
    }
    let minor = &rest[major_len + 1..];
    let minor_len = minor
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(minor.len());
    if minor_len == 0 {
        return None;
    }
    Some(format!("{}.{}", &rest[..major_len], &minor[..minor_len]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::parser::{BrowserInfo, CpuInfo, OsInfo};

    fn signature(browser: &str, os: &str, arch: &str) -> UaSignature {
        UaSignature {
            browser: BrowserInfo {
                name: browser.to_string(),
            },
            os: OsInfo {
                name: os.to_string(),
            },
            cpu: CpuInfo {
                architecture: arch.to_string(),
            },
        }
    }

    #[test]
    fn test_map_os_name_canonicalizes_known_linuxen() {
        assert_eq!(map_os_name("Ubuntu"), "Linux");
        assert_eq!(map_os_name("Debian"), "Linux");
        assert_eq!(map_os_name("Windows"), "Windows");
        assert_eq!(map_os_name(""), "");
    }

    #[test]
    fn test_map_arch_rewrites_amd64_only_on_linux() {
        assert_eq!(map_arch("amd64", "Linux"), "x86_64");
        assert_eq!(map_arch("amd64", "Windows"), "amd64");
        assert_eq!(map_arch("ia32", "Linux"), "ia32");
    }

    #[test]
    fn test_construct_platform_windows() {
        assert_eq!(
            construct_platform(&signature("Chrome", "Windows", "amd64")),
            "Win32"
        );
    }

    #[test]
    fn test_construct_platform_mac() {
        assert_eq!(
            construct_platform(&signature("Safari", "Mac OS", "")),
            "MacIntel"
        );
    }

    #[test]
    fn test_construct_platform_linux_distro() {
        assert_eq!(
            construct_platform(&signature("Firefox", "Ubuntu", "amd64")),
            "Linux x86_64"
        );
    }

    #[test]
    fn test_construct_platform_empty_os_keeps_leading_space() {
        assert_eq!(construct_platform(&signature("", "", "amd64")), " amd64");
    }

    #[test]
    fn test_mozilla_version_extraction() {
        assert_eq!(
            mozilla_version("Mozilla/5.0 (X11; Linux x86_64)"),
            Some("5.0".to_string())
        );
        assert_eq!(mozilla_version("Mozilla/x.0"), None);
        assert_eq!(mozilla_version("Opera/9.80"), None);
        assert_eq!(mozilla_version("Mozilla/5."), None);
    }

    #[test]
    fn test_firefox_app_version_requires_both_pieces() {
        let sig = signature("Firefox", "BeOS", "");
        assert_eq!(firefox_app_version(&sig, "Mozilla/5.0 (BeOS)"), "");

        let sig = signature("Firefox", "Windows", "amd64");
        assert_eq!(firefox_app_version(&sig, "NotMozilla/5.0"), "");
    }

    #[test]
    fn test_chrome_app_version_without_prefix_passes_through() {
        let sig = signature("Chrome", "Windows", "amd64");
        assert_eq!(
            construct_app_version(&sig, "Chrome-ish custom agent"),
            "Chrome-ish custom agent"
        );
    }

    #[test]
    fn test_derive_zeroes_oscpu_and_build_id() {
        let projection = SignatureCrafter::new()
            .derive("Mozilla/5.0 (Macintosh; Intel Mac OS X 10.12; rv:49.0) Gecko/20100101 Firefox/49.0");
        assert_eq!(projection.navigator.oscpu, "");
        assert_eq!(projection.navigator.build_id, "");
    }

    #[test]
    fn test_derive_is_idempotent() {
        let crafter = SignatureCrafter::new();
        let ua = "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:56.0) Gecko/20100101 Firefox/56.0";
        assert_eq!(crafter.derive(ua), crafter.derive(ua));
    }

    #[test]
    fn test_projection_serializes_page_visible_names() {
        let projection = SignatureCrafter::new()
            .derive("Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:56.0) Gecko/20100101 Firefox/56.0");
        let json = serde_json::to_value(&projection).unwrap();
        assert_eq!(json["navigator"]["platform"], "Linux x86_64");
        assert_eq!(json["navigator"]["appVersion"], "5.0 (X11)");
        assert_eq!(json["navigator"]["oscpu"], "");
        assert_eq!(json["navigator"]["buildID"], "");
    }
}
