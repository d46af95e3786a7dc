//! User-agent string parsing.
//!
//! Parsing is deliberately a seam: the rest of the crate only depends on the
//! [`UserAgentParser`] trait, so a host that already ships a user-agent
//! parsing library can plug it in. The bundled [`UaParser`] performs
//! case-insensitive substring classification, which is sufficient for the
//! browser/OS/CPU families the projection engine distinguishes.
//!
//! A malformed or unrecognized user agent is never an error: unknown fields
//! degrade to empty strings and the projection engine produces a best-effort,
//! reproducible result from them.

use serde::{Deserialize, Serialize};

/// Browser component of a parsed user-agent signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    /// Browser family name (e.g., "Chrome", "Firefox"), empty if unknown.
    pub name: String,
}

/// Operating-system component of a parsed user-agent signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    /// OS name (e.g., "Windows", "Mac OS", "Ubuntu"), empty if unknown.
    pub name: String,
}

/// CPU component of a parsed user-agent signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Canonical architecture token (e.g., "amd64", "ia32"), empty if unknown.
    pub architecture: String,
}

/// Structured fields extracted from a raw user-agent string.
///
/// Produced once per page-load from the immutable user-agent string and
/// read-only after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UaSignature {
    pub browser: BrowserInfo,
    pub os: OsInfo,
    pub cpu: CpuInfo,
}

/// Seam for user-agent parsing.
///
/// Implementations must be pure: the same input string always yields the
/// same signature. The projection derived from the signature is memoized per
/// page-load, so an impure parser would produce incoherent fingerprints.
pub trait UserAgentParser: Send + Sync {
    /// Parses a raw user-agent string into structured fields.
    fn parse(&self, user_agent: &str) -> UaSignature;
}

/// Default substring-classification parser.
///
/// Classification order matters: an Edge user agent also contains "Chrome",
/// a Chromium user agent also contains "Chrome/", and a Chrome user agent
/// also contains "Safari". Each check below is ordered so the most specific
/// token wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct UaParser;

impl UaParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    fn browser_name(ua: &str) -> &'static str {
        if ua.contains("firefox") {
            "Firefox"
        } else if ua.contains("edg") {
            "Edge"
        } else if ua.contains("chromium") {
            "Chromium"
        } else if ua.contains("chrome") {
            "Chrome"
        } else if ua.contains("trident") || ua.contains("msie") {
            "IE"
        } else if ua.contains("safari") {
            "Safari"
        } else {
            ""
        }
    }

    fn os_name(ua: &str) -> &'static str {
        // Distribution tokens win over the generic "Linux" token.
        if ua.contains("ubuntu") {
            "Ubuntu"
        } else if ua.contains("debian") {
            "Debian"
        } else if ua.contains("windows") {
            "Windows"
        } else if ua.contains("macintosh") || ua.contains("mac os x") {
            "Mac OS"
        } else if ua.contains("linux") || ua.contains("x11") {
            "Linux"
        } else {
            ""
        }
    }

    fn cpu_architecture(ua: &str) -> &'static str {
        // 64-bit x86 is canonicalized to "amd64" regardless of how the
        // user agent spells it; the projection engine maps it back to the
        // platform-appropriate spelling.
        if ua.contains("x86_64")
            || ua.contains("x86-64")
            || ua.contains("x64")
            || ua.contains("amd64")
            || ua.contains("wow64")
        {
            "amd64"
        } else if ua.contains("i686") || ua.contains("i386") {
            "ia32"
        } else if ua.contains("aarch64") || ua.contains("arm64") {
            "arm64"
        } else {
            ""
        }
    }
}

impl UserAgentParser for UaParser {
    fn parse(&self, user_agent: &str) -> UaSignature {
        let ua = user_agent.to_lowercase();
        UaSignature {
            browser: BrowserInfo {
                name: Self::browser_name(&ua).to_string(),
            },
            os: OsInfo {
                name: Self::os_name(&ua).to_string(),
            },
            cpu: CpuInfo {
                architecture: Self::cpu_architecture(&ua).to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(ua: &str) -> UaSignature {
        UaParser::new().parse(ua)
    }

    #[test]
    fn test_firefox_on_ubuntu() {
        let sig = parse("Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:56.0) Gecko/20100101 Firefox/56.0");
        assert_eq!(sig.browser.name, "Firefox");
        assert_eq!(sig.os.name, "Ubuntu");
        assert_eq!(sig.cpu.architecture, "amd64");
    }

    #[test]
    fn test_chrome_on_windows() {
        let sig = parse("Mozilla/5.0 (Windows NT 6.3; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36");
        assert_eq!(sig.browser.name, "Chrome");
        assert_eq!(sig.os.name, "Windows");
        assert_eq!(sig.cpu.architecture, "amd64");
    }

    #[test]
    fn test_chromium_wins_over_chrome() {
        let sig = parse("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Ubuntu Chromium/61.0.3163.100 Chrome/61.0.3163.100 Safari/537.36");
        assert_eq!(sig.browser.name, "Chromium");
        assert_eq!(sig.os.name, "Ubuntu");
    }

    #[test]
    fn test_safari_requires_absence_of_chrome() {
        let sig = parse("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_5) AppleWebKit/603.2.4 (KHTML, like Gecko) Version/10.1.1 Safari/603.2.4");
        assert_eq!(sig.browser.name, "Safari");
        assert_eq!(sig.os.name, "Mac OS");
    }

    #[test]
    fn test_internet_explorer_via_trident() {
        let sig = parse("Mozilla/5.0 (Windows NT 6.3; WOW64; Trident/7.0; rv:11.0) like Gecko");
        assert_eq!(sig.browser.name, "IE");
        assert_eq!(sig.cpu.architecture, "amd64");
    }

    #[test]
    fn test_unknown_fields_degrade_to_empty() {
        let sig = parse("definitely not a browser");
        assert_eq!(sig.browser.name, "");
        assert_eq!(sig.os.name, "");
        assert_eq!(sig.cpu.architecture, "");
    }

    #[test]
    fn test_parse_is_pure() {
        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.12; rv:49.0) Gecko/20100101 Firefox/49.0";
        assert_eq!(parse(ua), parse(ua));
    }
}
