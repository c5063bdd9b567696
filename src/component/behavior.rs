//! Behavior model - Declared state, computed fields, and methods.
//!
//! A behavior is what a script module exports: a `data` initializer run
//! once per instantiation, a table of computed (derived) fields, and a
//! table of methods. Within a kind, a later declaration of the same name
//! overwrites the earlier one; across kinds, colliding names are rejected
//! (at definition time for computed/method, at instantiation time for data
//! fields, whose names are only known once `data` runs).
//!
//! # Example
//!
//! ```ignore
//! use weft::component::behavior::BehaviorBuilder;
//!
//! let behavior = BehaviorBuilder::new()
//!     .data(|| HashMap::from([("count".to_string(), Value::Int(0))]))
//!     .computed("doubled", |i| {
//!         Ok(Value::Int(i.get("count")?.as_int().unwrap_or(0) * 2))
//!     })
//!     .method("bump", |i| {
//!         let count = i.get("count")?.as_int().unwrap_or(0);
//!         i.set("count", Value::Int(count + 1))
//!     })
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::instance::Instance;
use crate::types::Value;

// =============================================================================
// Callback Types
// =============================================================================

/// Initial-data function: produces the instance's base field set.
///
/// Re-invoked on every instantiation; instances never share the result.
pub type DataInit = Rc<dyn Fn() -> HashMap<String, Value>>;

/// Computed-field getter. Receives the instance so it can read base fields
/// and other computed fields (nested reads re-derive on the spot).
pub type Getter = Rc<dyn Fn(&Instance) -> Result<Value, RuntimeError>>;

/// Computed-field setter. Receives the written value and is expected to
/// mutate one or more base fields through the instance; the container does
/// not check that it changed anything.
pub type Setter = Rc<dyn Fn(&Instance, Value) -> Result<(), RuntimeError>>;

/// Instance method. The receiver is the instance's field mapping: methods
/// read and write fields directly through it.
pub type Method = Rc<dyn Fn(&Instance) -> Result<(), RuntimeError>>;

// =============================================================================
// Derived Fields
// =============================================================================

/// A computed field: derived on every read from current base-field state.
///
/// There is deliberately no caching here. A read always re-runs the getter,
/// so derived values can never go stale after a method mutates base fields.
#[derive(Clone)]
pub enum DerivedField {
    /// Pure getter; writes are rejected.
    ReadOnly(Getter),
    /// Getter plus a setter that maps writes onto backing base fields.
    ReadWrite { get: Getter, set: Setter },
}

impl DerivedField {
    /// The getter, for either variant.
    pub fn getter(&self) -> &Getter {
        match self {
            DerivedField::ReadOnly(get) => get,
            DerivedField::ReadWrite { get, .. } => get,
        }
    }
}

impl fmt::Debug for DerivedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivedField::ReadOnly(_) => write!(f, "ReadOnly(..)"),
            DerivedField::ReadWrite { .. } => write!(f, "ReadWrite(..)"),
        }
    }
}

// =============================================================================
// Behavior
// =============================================================================

/// The runtime shape a script module declares for a component.
pub struct Behavior {
    pub(crate) data: DataInit,
    pub(crate) computed: HashMap<String, DerivedField>,
    pub(crate) methods: HashMap<String, Method>,
}

impl Behavior {
    /// The declared computed-field table.
    pub fn computed(&self) -> &HashMap<String, DerivedField> {
        &self.computed
    }

    /// Whether the behavior declares a method with this name.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Reject names declared both as a computed field and a method.
    pub(crate) fn validate_names(&self) -> Result<(), RuntimeError> {
        for name in self.computed.keys() {
            if self.methods.contains_key(name) {
                return Err(RuntimeError::FieldCollision {
                    name: name.clone(),
                    first: "a computed field",
                    second: "a method",
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("computed", &self.computed.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Behavior`].
#[derive(Default)]
pub struct BehaviorBuilder {
    data: Option<DataInit>,
    computed: HashMap<String, DerivedField>,
    methods: HashMap<String, Method>,
}

impl BehaviorBuilder {
    /// Start an empty behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial-data function.
    pub fn data(mut self, init: impl Fn() -> HashMap<String, Value> + 'static) -> Self {
        self.data = Some(Rc::new(init));
        self
    }

    /// Declare a read-only computed field. A later declaration of the same
    /// name replaces the earlier one.
    pub fn computed(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&Instance) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.computed
            .insert(name.into(), DerivedField::ReadOnly(Rc::new(get)));
        self
    }

    /// Declare a read/write computed field.
    pub fn computed_rw(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&Instance) -> Result<Value, RuntimeError> + 'static,
        set: impl Fn(&Instance, Value) -> Result<(), RuntimeError> + 'static,
    ) -> Self {
        self.computed.insert(
            name.into(),
            DerivedField::ReadWrite {
                get: Rc::new(get),
                set: Rc::new(set),
            },
        );
        self
    }

    /// Declare a method. A later declaration of the same name replaces the
    /// earlier one.
    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&Instance) -> Result<(), RuntimeError> + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    /// Finish, rejecting computed/method name collisions.
    pub fn build(self) -> Result<Behavior, RuntimeError> {
        let data: DataInit = match self.data {
            Some(data) => data,
            None => Rc::new(HashMap::<String, Value>::new),
        };
        let behavior = Behavior {
            data,
            computed: self.computed,
            methods: self.methods,
        };
        behavior.validate_names()?;
        Ok(behavior)
    }
}

// =============================================================================
// Script Exports
// =============================================================================

/// What a script module exports: the behavior, tagged by export style.
///
/// The build step emits either a behavior assigned directly to the module
/// exports or one wrapped as a marked default export. The registry
/// normalizes the two by pattern match; there is no property probing.
#[derive(Clone)]
pub enum ScriptExport {
    /// Behavior assigned directly to the module exports.
    Direct(Rc<Behavior>),
    /// Behavior carried as the marked default export.
    Default(Rc<Behavior>),
}

impl ScriptExport {
    /// The effective behavior, whichever way it was exported.
    pub fn into_behavior(self) -> Rc<Behavior> {
        match self {
            ScriptExport::Direct(behavior) => behavior,
            ScriptExport::Default(behavior) => behavior,
        }
    }
}

impl fmt::Debug for ScriptExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptExport::Direct(b) => write!(f, "Direct({b:?})"),
            ScriptExport::Default(b) => write!(f, "Default({b:?})"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind_overwrites() {
        let behavior = BehaviorBuilder::new()
            .computed("x", |_| Ok(Value::Int(1)))
            .computed("x", |_| Ok(Value::Int(2)))
            .build()
            .unwrap();

        let instance = Instance::new(Rc::new(behavior)).unwrap();
        assert_eq!(instance.get("x").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_cross_kind_collision_rejected() {
        let err = BehaviorBuilder::new()
            .computed("go", |_| Ok(Value::Null))
            .method("go", |_| Ok(()))
            .build()
            .unwrap_err();

        assert!(matches!(err, RuntimeError::FieldCollision { .. }));
    }

    #[test]
    fn test_export_normalization() {
        let direct = ScriptExport::Direct(Rc::new(
            BehaviorBuilder::new().build().unwrap(),
        ));
        let wrapped = ScriptExport::Default(Rc::new(
            BehaviorBuilder::new().method("m", |_| Ok(())).build().unwrap(),
        ));

        assert!(!direct.into_behavior().has_method("m"));
        assert!(wrapped.into_behavior().has_method("m"));
    }
}
