//! Host object model.
//!
//! The override engine never mutates an ambient global; it operates on an
//! explicit [`HostObject`] passed in by the caller. The model mirrors the
//! parts of the JavaScript property machinery the engine relies on: data
//! slots with `writable`/`configurable` flags, accessor slots whose setter
//! is a silent no-op, and `defineProperty`-style redefinition that fails on
//! non-configurable slots.
//!
//! Property values are `Option<serde_json::Value>` where `None` stands for
//! JavaScript `undefined` (distinct from `Value::Null`).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::reform::ReformError;

/// Shared getter closure for an accessor slot.
pub type Getter = Arc<dyn Fn() -> Option<Value> + Send + Sync>;

/// Attributes attached to a property slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyAttributes {
    /// Whether writes through [`HostObject::set`] take effect (data slots only).
    pub writable: bool,
    /// Whether the property shows up in [`HostObject::enumerate`].
    pub enumerable: bool,
    /// Whether the slot may be redefined later.
    pub configurable: bool,
}

impl Default for PropertyAttributes {
    fn default() -> Self {
        Self {
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }
}

impl PropertyAttributes {
    /// Attributes for an installed override accessor: configurable so the
    /// engine can be re-applied, non-enumerable so the override does not
    /// advertise itself during property enumeration.
    pub fn override_accessor() -> Self {
        Self {
            writable: false,
            enumerable: false,
            configurable: true,
        }
    }

    /// Marks the slot non-configurable.
    pub fn sealed(mut self) -> Self {
        self.configurable = false;
        self
    }
}

enum Slot {
    Data {
        value: Option<Value>,
        attributes: PropertyAttributes,
    },
    Accessor {
        get: Getter,
        attributes: PropertyAttributes,
    },
}

impl Slot {
    fn attributes(&self) -> PropertyAttributes {
        match self {
            Slot::Data { attributes, .. } | Slot::Accessor { attributes, .. } => *attributes,
        }
    }
}

/// An explicit stand-in for the page's `navigator` object.
///
/// Interior mutability lets installed getter closures and page-script-style
/// reads coexist; all slot access goes through one lock.
///
/// # Example
///
/// ```rust
/// use antiprint::reform::{HostObject, PropertyAttributes};
/// use serde_json::json;
///
/// let navigator = HostObject::new();
/// navigator.seed_data("platform", Some(json!("Linux x86_64")), PropertyAttributes::default());
/// assert_eq!(navigator.get("platform"), Some(json!("Linux x86_64")));
/// ```
#[derive(Default)]
pub struct HostObject {
    slots: RwLock<HashMap<String, Slot>>,
}

impl HostObject {
    /// Creates an empty host object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a data property unconditionally, bypassing configurability
    /// checks. This models the engine-owned initial state of the object,
    /// not a page-visible mutation.
    pub fn seed_data(
        &self,
        name: impl Into<String>,
        value: Option<Value>,
        attributes: PropertyAttributes,
    ) {
        self.slots
            .write()
            .insert(name.into(), Slot::Data { value, attributes });
    }

    /// Returns whether the property exists on the object (the `in` operator).
    pub fn contains(&self, name: &str) -> bool {
        self.slots.read().contains_key(name)
    }

    /// Reads a property. Absent properties read as `undefined` (`None`),
    /// exactly like a JavaScript member access.
    pub fn get(&self, name: &str) -> Option<Value> {
        let slots = self.slots.read();
        match slots.get(name) {
            Some(Slot::Data { value, .. }) => value.clone(),
            Some(Slot::Accessor { get, .. }) => {
                let get = get.clone();
                drop(slots);
                get()
            }
            None => None,
        }
    }

    /// Writes a property with page-script semantics: accessor writes and
    /// non-writable data writes are silent no-ops (sloppy mode, no throw),
    /// writable data slots update, absent properties are created.
    pub fn set(&self, name: &str, value: Value) {
        let mut slots = self.slots.write();
        match slots.get_mut(name) {
            Some(Slot::Accessor { .. }) => {}
            Some(Slot::Data {
                value: slot_value,
                attributes,
            }) => {
                if attributes.writable {
                    *slot_value = Some(value);
                }
            }
            None => {
                slots.insert(
                    name.to_string(),
                    Slot::Data {
                        value: Some(value),
                        attributes: PropertyAttributes::default(),
                    },
                );
            }
        }
    }

    /// Redefines a property as an accessor whose setter is a silent no-op.
    ///
    /// Fails with [`ReformError::NotConfigurable`] when the existing slot
    /// refuses redefinition; the caller decides whether that is fatal.
    pub fn define_accessor(
        &self,
        name: impl Into<String>,
        get: Getter,
        attributes: PropertyAttributes,
    ) -> Result<(), ReformError> {
        let name = name.into();
        let mut slots = self.slots.write();
        if let Some(existing) = slots.get(&name) {
            if !existing.attributes().configurable {
                return Err(ReformError::NotConfigurable(name));
            }
        }
        slots.insert(name, Slot::Accessor { get, attributes });
        Ok(())
    }

    /// Names of enumerable properties, unordered (`for...in` visibility).
    pub fn enumerate(&self) -> Vec<String> {
        self.slots
            .read()
            .iter()
            .filter(|(_, slot)| slot.attributes().enumerable)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl std::fmt::Debug for HostObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostObject")
            .field("properties", &self.slots.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_property_reads_as_undefined() {
        let object = HostObject::new();
        assert!(!object.contains("platform"));
        assert_eq!(object.get("platform"), None);
    }

    #[test]
    fn test_data_property_roundtrip() {
        let object = HostObject::new();
        object.seed_data("platform", Some(json!("Win32")), PropertyAttributes::default());
        assert_eq!(object.get("platform"), Some(json!("Win32")));
        object.set("platform", json!("Linux x86_64"));
        assert_eq!(object.get("platform"), Some(json!("Linux x86_64")));
    }

    #[test]
    fn test_non_writable_data_write_is_silent_noop() {
        let object = HostObject::new();
        let attrs = PropertyAttributes {
            writable: false,
            ..Default::default()
        };
        object.seed_data("platform", Some(json!("Win32")), attrs);
        object.set("platform", json!("spoofed"));
        assert_eq!(object.get("platform"), Some(json!("Win32")));
    }

    #[test]
    fn test_accessor_write_is_silent_noop() {
        let object = HostObject::new();
        object
            .define_accessor(
                "platform",
                Arc::new(|| Some(json!("MacIntel"))),
                PropertyAttributes::override_accessor(),
            )
            .unwrap();
        object.set("platform", json!("spoofed"));
        assert_eq!(object.get("platform"), Some(json!("MacIntel")));
    }

    #[test]
    fn test_non_configurable_slot_refuses_redefinition() {
        let object = HostObject::new();
        object.seed_data(
            "platform",
            Some(json!("Win32")),
            PropertyAttributes::default().sealed(),
        );
        let result = object.define_accessor(
            "platform",
            Arc::new(|| None),
            PropertyAttributes::override_accessor(),
        );
        assert!(matches!(result, Err(ReformError::NotConfigurable(_))));
        assert_eq!(object.get("platform"), Some(json!("Win32")));
    }

    #[test]
    fn test_override_accessor_is_not_enumerable() {
        let object = HostObject::new();
        object.seed_data("oscpu", Some(json!("Linux x86_64")), PropertyAttributes::default());
        object
            .define_accessor(
                "oscpu",
                Arc::new(|| Some(json!(""))),
                PropertyAttributes::override_accessor(),
            )
            .unwrap();
        assert!(object.enumerate().is_empty());
    }
}
