//! Privileged-to-page bridge.
//!
//! Accessor installation performed in an isolated realm does not affect the
//! `navigator` object the page's own scripts see, so the override routine
//! has to execute inside the page realm itself. The bridge therefore deals
//! in a serialization contract: a pure data payload (the [`Projection`],
//! serialized as a JSON literal) applied by a fixed, versioned routine whose
//! source mirrors [`install`](crate::reform::install) semantics exactly.
//!
//! The boundary-crossing mechanism is host-specific and hidden behind the
//! narrow [`PageRealmInjector`] seam. Whatever the mechanism, two contract
//! points are non-negotiable: the script must run before any other page
//! script can read `navigator.platform`/`appVersion`/etc. (document-start),
//! and the injection artifact must be removed immediately after execution
//! to minimize detectability.

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::reform::engine::{navigator_property_specs, OverrideMode};
use crate::reform::ReformError;
use crate::signature::{Projection, SignatureCrafter};

/// Version of the page-realm apply routine embedded in rendered scripts.
pub const APPLY_ROUTINE_VERSION: u32 = 1;

/// Name of the page-visible settings object consulted by installed getters.
pub const SETTINGS_OBJECT: &str = "AntiprintSettings";

/// Computes and memoizes the projection for one page-load.
///
/// The projection is derived at most once per bridge, lazily on first use
/// or eagerly at injection time. This is a correctness requirement rather
/// than an optimization: recomputing against a possibly-changed context
/// could hand the page an incoherent signature mid-load.
#[derive(Debug)]
pub struct ProjectionBridge {
    user_agent: String,
    crafter: SignatureCrafter,
    projection: OnceCell<Projection>,
}

impl ProjectionBridge {
    /// Creates a bridge for the live user-agent string of this page-load.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self::with_crafter(user_agent, SignatureCrafter::new())
    }

    /// Creates a bridge with a custom crafter (custom parser seam).
    pub fn with_crafter(user_agent: impl Into<String>, crafter: SignatureCrafter) -> Self {
        Self {
            user_agent: user_agent.into(),
            crafter,
            projection: OnceCell::new(),
        }
    }

    /// The raw user-agent string the bridge derives from.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The memoized projection; derived on first call, stable afterwards.
    pub fn projection(&self) -> &Projection {
        self.projection
            .get_or_init(|| self.crafter.derive(&self.user_agent))
    }
}

/// Single narrow seam for host-specific realm crossing.
///
/// Implementations must execute `script` in the page's own JavaScript realm
/// (not a sandboxed copy), at the earliest safe point of document parsing,
/// and remove the injection artifact once it has run.
pub trait PageRealmInjector {
    fn inject(&self, script: &str) -> Result<(), ReformError>;
}

/// Runs the bridge for one page-load: derive once, render, inject.
pub fn reform_page(
    bridge: &ProjectionBridge,
    injector: &dyn PageRealmInjector,
) -> Result<(), ReformError> {
    let projection = bridge.projection();
    let script = render_apply_script(projection);
    debug!(
        platform = %projection.navigator.platform,
        script_bytes = script.len(),
        "injecting navigator reform into page realm"
    );
    injector.inject(&script)
}

fn mode_token(mode: OverrideMode) -> &'static str {
    match mode {
        OverrideMode::AlwaysRedefine => "redefine",
        OverrideMode::RedefineIfPresent => "maybeRedefine",
        OverrideMode::Undefine => "undefine",
    }
}

fn render_spec_rows() -> String {
    navigator_property_specs()
        .iter()
        .map(|spec| {
            format!(
                "        {{ name: '{}', mode: '{}' }}",
                spec.name,
                mode_token(spec.mode)
            )
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Renders the same-realm executable unit for a projection.
///
/// The projection is baked in as a JSON literal (serde_json escaping is
/// valid JavaScript), so the page realm never needs to reach back into the
/// privileged context. The routine's property table is rendered from
/// [`navigator_property_specs`], keeping both sides of the bridge on one
/// source of truth.
pub fn render_apply_script(projection: &Projection) -> String {
    let payload =
        serde_json::to_string(projection).expect("projection serialization is infallible");

    format!(
        r#"/* antiprint apply routine v{version} */
(function (projection) {{
    'use strict';

    var MODE_ALWAYS_REDEFINE = 'redefine';
    var MODE_UNDEFINE = 'undefine';

    var PROJECTED_NAVIGATOR_PROPERTIES = [
{spec_rows}
    ];
    var NOOP = function () {{}};
    var previous = {{}};

    PROJECTED_NAVIGATOR_PROPERTIES.forEach(function (spec) {{
        var property = spec.name;
        if (spec.mode !== MODE_ALWAYS_REDEFINE && !(property in navigator)) {{
            return;
        }}
        previous[property] = navigator[property];
        try {{
            Object.defineProperty(navigator, property, {{
                get: function () {{
                    if (window.{settings} && window.{settings}.disabled) {{
                        return previous[property];
                    }}
                    if (spec.mode === MODE_UNDEFINE) {{
                        return undefined;
                    }}
                    return projection.navigator[property];
                }},
                set: NOOP,
                configurable: true
            }});
        }} catch (err) {{
            console.debug('antiprint: error defining navigator property', property, err);
        }}
    }});
}})({payload});
"#,
        version = APPLY_ROUTINE_VERSION,
        spec_rows = render_spec_rows(),
        settings = SETTINGS_OBJECT,
        payload = payload,
    )
}
