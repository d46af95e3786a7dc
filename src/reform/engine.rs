//! Property override engine.
//!
//! Given a target object, a table of [`PropertySpec`]s, and a derived
//! [`Projection`], [`install`] replaces each listed navigator property with
//! a computed accessor. The engine is deliberately table-driven: which
//! properties are touched, and how, is static configuration rather than
//! per-instance data.
//!
//! Failure to redefine one property never aborts the rest. Partial
//! application degrades gracefully; the returned [`InstallReport`] records
//! what happened per property.
//!
//! # Example
//!
//! ```rust
//! use antiprint::reform::{install, navigator_property_specs, never_disabled, HostObject};
//! use antiprint::signature::SignatureCrafter;
//!
//! let navigator = HostObject::new();
//! let projection = SignatureCrafter::new()
//!     .derive("Mozilla/5.0 (Windows NT 6.3; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36");
//!
//! let report = install(&navigator, &navigator_property_specs(), &projection, never_disabled());
//! assert!(report.failed.is_empty());
//! assert_eq!(navigator.get("platform"), Some("Win32".into()));
//! ```

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::reform::target::{Getter, HostObject, PropertyAttributes};
use crate::signature::Projection;

/// Capability consulted on every overridden read.
///
/// When it reports `true`, getters fall back to the value captured before
/// installation, allowing a user or diagnostic override without reloading
/// the override machinery. Injected explicitly rather than read from an
/// ambient global.
pub type DisableFlag = Arc<dyn Fn() -> bool + Send + Sync>;

/// A disable flag that never disables; the common production wiring.
pub fn never_disabled() -> DisableFlag {
    Arc::new(|| false)
}

/// How a property spec decides whether and what to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideMode {
    /// Install the accessor whether or not the property exists.
    AlwaysRedefine,
    /// Install only if the property already exists on the target.
    RedefineIfPresent,
    /// Install only if present, and project `undefined` unconditionally,
    /// suppressing the property instead of replacing its value.
    Undefine,
}

/// Maps a projection to the value an overridden property should report.
pub type Projector = fn(&Projection) -> Option<Value>;

/// One row of the override table: a navigator property, the mode deciding
/// whether to act, and the projector producing the spoofed value.
#[derive(Clone)]
pub struct PropertySpec {
    pub name: &'static str,
    pub mode: OverrideMode,
    projector: Projector,
}

impl PropertySpec {
    /// Creates a spec row.
    pub const fn new(name: &'static str, mode: OverrideMode, projector: Projector) -> Self {
        Self {
            name,
            mode,
            projector,
        }
    }

    /// Whether the spec applies to the given target.
    pub fn should_define(&self, target: &HostObject) -> bool {
        match self.mode {
            OverrideMode::AlwaysRedefine => true,
            OverrideMode::RedefineIfPresent | OverrideMode::Undefine => {
                target.contains(self.name)
            }
        }
    }

    /// The value the installed getter reports while the override is active.
    pub fn project(&self, projection: &Projection) -> Option<Value> {
        match self.mode {
            OverrideMode::Undefine => None,
            _ => (self.projector)(projection),
        }
    }
}

impl std::fmt::Debug for PropertySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySpec")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish()
    }
}

fn project_platform(projection: &Projection) -> Option<Value> {
    Some(Value::String(projection.navigator.platform.clone()))
}

fn project_app_version(projection: &Projection) -> Option<Value> {
    Some(Value::String(projection.navigator.app_version.clone()))
}

fn project_oscpu(projection: &Projection) -> Option<Value> {
    Some(Value::String(projection.navigator.oscpu.clone()))
}

fn project_build_id(projection: &Projection) -> Option<Value> {
    Some(Value::String(projection.navigator.build_id.clone()))
}

fn project_undefined(_: &Projection) -> Option<Value> {
    None
}

/// The static override table for `navigator`.
///
/// `platform` exists on every engine, so it is always redefined. `oscpu`
/// and `buildID` are Gecko-only and must not appear on engines that never
/// had them, so they are redefined only if present, as is `appVersion`.
/// `webdriver` is suppressed outright rather than projected.
pub fn navigator_property_specs() -> Vec<PropertySpec> {
    vec![
        PropertySpec::new("platform", OverrideMode::AlwaysRedefine, project_platform),
        PropertySpec::new("oscpu", OverrideMode::RedefineIfPresent, project_oscpu),
        PropertySpec::new("buildID", OverrideMode::RedefineIfPresent, project_build_id),
        PropertySpec::new(
            "appVersion",
            OverrideMode::RedefineIfPresent,
            project_app_version,
        ),
        PropertySpec::new("webdriver", OverrideMode::Undefine, project_undefined),
    ]
}

/// Per-property outcome of an [`install`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Properties now backed by an override accessor.
    pub installed: Vec<String>,
    /// Properties whose spec did not apply to this target.
    pub skipped: Vec<String>,
    /// Properties the host refused to redefine.
    pub failed: Vec<String>,
}

impl InstallReport {
    /// True when every applicable property was overridden.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Installs override accessors on `target` for every applicable spec.
///
/// For each property the original value is captured first; the installed
/// getter returns the projected value, or the captured original while
/// `disabled` reports true. Writes through the accessor are silent no-ops.
/// A non-configurable property is logged at debug level and skipped without
/// aborting the remaining installations.
pub fn install(
    target: &HostObject,
    specs: &[PropertySpec],
    projection: &Projection,
    disabled: DisableFlag,
) -> InstallReport {
    let mut report = InstallReport::default();

    for spec in specs {
        if !spec.should_define(target) {
            debug!(property = spec.name, "property absent on target, not defining");
            report.skipped.push(spec.name.to_string());
            continue;
        }

        let original = target.get(spec.name);
        let projected = spec.project(projection);
        let flag = disabled.clone();
        let getter: Getter = Arc::new(move || {
            if flag() {
                original.clone()
            } else {
                projected.clone()
            }
        });

        match target.define_accessor(spec.name, getter, PropertyAttributes::override_accessor()) {
            Ok(()) => report.installed.push(spec.name.to_string()),
            Err(err) => {
                debug!(property = spec.name, error = %err, "error defining navigator property");
                report.failed.push(spec.name.to_string());
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn linux_firefox_projection() -> Projection {
        crate::signature::SignatureCrafter::new()
            .derive("Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:56.0) Gecko/20100101 Firefox/56.0")
    }

    fn gecko_navigator() -> HostObject {
        let navigator = HostObject::new();
        navigator.seed_data("platform", Some(json!("Linux x86_64")), PropertyAttributes::default());
        navigator.seed_data("oscpu", Some(json!("Linux x86_64")), PropertyAttributes::default());
        navigator.seed_data("buildID", Some(json!("20171003100843")), PropertyAttributes::default());
        navigator.seed_data(
            "appVersion",
            Some(json!("5.0 (X11)")),
            PropertyAttributes::default(),
        );
        navigator.seed_data("webdriver", Some(json!(true)), PropertyAttributes::default());
        navigator
    }

    #[test]
    fn test_table_covers_all_reformed_properties() {
        let names: Vec<&str> = navigator_property_specs().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["platform", "oscpu", "buildID", "appVersion", "webdriver"]
        );
    }

    #[test]
    fn test_undefine_projects_none_regardless_of_projector() {
        let spec = PropertySpec::new("webdriver", OverrideMode::Undefine, project_platform);
        assert_eq!(spec.project(&linux_firefox_projection()), None);
    }

    #[test]
    fn test_install_on_gecko_navigator() {
        let navigator = gecko_navigator();
        let report = install(
            &navigator,
            &navigator_property_specs(),
            &linux_firefox_projection(),
            never_disabled(),
        );

        assert!(report.is_complete());
        assert_eq!(report.installed.len(), 5);
        assert_eq!(navigator.get("platform"), Some(json!("Linux x86_64")));
        assert_eq!(navigator.get("oscpu"), Some(json!("")));
        assert_eq!(navigator.get("buildID"), Some(json!("")));
        assert_eq!(navigator.get("webdriver"), None);
    }

    #[test]
    fn test_if_present_properties_are_not_created() {
        // A Blink navigator never had oscpu or buildID.
        let navigator = HostObject::new();
        navigator.seed_data("platform", Some(json!("Win32")), PropertyAttributes::default());

        let report = install(
            &navigator,
            &navigator_property_specs(),
            &linux_firefox_projection(),
            never_disabled(),
        );

        assert!(report.skipped.contains(&"oscpu".to_string()));
        assert!(report.skipped.contains(&"buildID".to_string()));
        assert!(!navigator.contains("oscpu"));
        assert!(!navigator.contains("buildID"));
        // platform is installed even on an empty slot set
        assert!(report.installed.contains(&"platform".to_string()));
    }

    #[test]
    fn test_disable_flag_checked_on_every_read() {
        let navigator = gecko_navigator();
        let disabled = Arc::new(AtomicBool::new(false));
        let flag = disabled.clone();
        install(
            &navigator,
            &navigator_property_specs(),
            &linux_firefox_projection(),
            Arc::new(move || flag.load(Ordering::SeqCst)),
        );

        assert_eq!(navigator.get("oscpu"), Some(json!("")));

        disabled.store(true, Ordering::SeqCst);
        assert_eq!(navigator.get("oscpu"), Some(json!("Linux x86_64")));
        assert_eq!(navigator.get("buildID"), Some(json!("20171003100843")));
        assert_eq!(navigator.get("webdriver"), Some(json!(true)));

        disabled.store(false, Ordering::SeqCst);
        assert_eq!(navigator.get("oscpu"), Some(json!("")));
    }

    #[test]
    fn test_non_configurable_property_fails_without_aborting() {
        let navigator = gecko_navigator();
        navigator.seed_data(
            "platform",
            Some(json!("Linux x86_64")),
            PropertyAttributes::default().sealed(),
        );

        let report = install(
            &navigator,
            &navigator_property_specs(),
            &linux_firefox_projection(),
            never_disabled(),
        );

        assert_eq!(report.failed, vec!["platform".to_string()]);
        assert!(report.installed.contains(&"oscpu".to_string()));
        assert!(report.installed.contains(&"webdriver".to_string()));
        assert_eq!(navigator.get("oscpu"), Some(json!("")));
    }

    #[test]
    fn test_overridden_write_is_noop() {
        let navigator = gecko_navigator();
        install(
            &navigator,
            &navigator_property_specs(),
            &linux_firefox_projection(),
            never_disabled(),
        );

        navigator.set("platform", json!("spoofed"));
        assert_eq!(navigator.get("platform"), Some(json!("Linux x86_64")));
    }
}
