//! Component Instance - Reactive state container.
//!
//! An instance owns the base field map produced by its behavior's `data`
//! initializer plus the behavior's computed and method tables. Reads of a
//! computed field re-run its getter against current state every time
//! (derived-on-read); writes to a read/write computed field route through
//! its setter, which mutates backing base fields; methods run with the
//! instance as receiver and mutate base fields directly.
//!
//! Lifecycle: `Instance::new` runs `data` once (uninstantiated →
//! data-initialized) and the instance is live from then on, accepting
//! reads, writes, and dispatch indefinitely. There is no error state:
//! failures in user closures propagate to the caller and leave the field
//! map as the closure left it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::component::behavior::{Behavior, DerivedField};
use crate::error::RuntimeError;
use crate::types::Value;

/// Upper bound on nested computed reads. Legitimate computed→computed
/// chains are shallow; hitting this means a getter cycle.
pub const MAX_DERIVED_DEPTH: usize = 64;

// =============================================================================
// Instance
// =============================================================================

/// A live, stateful realization of a component's behavior.
///
/// Single-threaded by design (interior mutability via `RefCell`/`Cell`);
/// the whole runtime executes on one logical thread with no suspension
/// points.
pub struct Instance {
    fields: RefCell<HashMap<String, Value>>,
    behavior: Rc<Behavior>,
    depth: Cell<usize>,
}

impl Instance {
    /// Instantiate a behavior.
    ///
    /// Runs the `data` initializer (exactly once; every instantiation gets
    /// its own map, never shared) and rejects data-field names that collide
    /// with a computed field or method.
    pub fn new(behavior: Rc<Behavior>) -> Result<Self, RuntimeError> {
        let fields = (behavior.data)();

        for name in fields.keys() {
            if behavior.computed.contains_key(name) {
                return Err(RuntimeError::FieldCollision {
                    name: name.clone(),
                    first: "a data field",
                    second: "a computed field",
                });
            }
            if behavior.methods.contains_key(name) {
                return Err(RuntimeError::FieldCollision {
                    name: name.clone(),
                    first: "a data field",
                    second: "a method",
                });
            }
        }

        Ok(Self {
            fields: RefCell::new(fields),
            behavior,
            depth: Cell::new(0),
        })
    }

    /// Read a field.
    ///
    /// Computed fields re-run their getter against current state on every
    /// read; base fields return a clone of the stored value.
    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        if let Some(derived) = self.behavior.computed.get(name) {
            return self.read_derived(name, derived);
        }
        let fields = self.fields.borrow();
        fields
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownField(name.to_string()))
    }

    /// Write a field.
    ///
    /// A read/write computed field routes through its setter (which mutates
    /// backing base fields through this instance); a read-only computed
    /// field rejects the write; any other name writes the base field
    /// directly, creating it if absent.
    pub fn set(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if let Some(derived) = self.behavior.computed.get(name) {
            return match derived {
                DerivedField::ReadWrite { set, .. } => set(self, value),
                DerivedField::ReadOnly(_) => {
                    Err(RuntimeError::ReadOnlyField(name.to_string()))
                }
            };
        }
        if self.behavior.methods.contains_key(name) {
            return Err(RuntimeError::FieldCollision {
                name: name.to_string(),
                first: "a base field write",
                second: "a method",
            });
        }
        self.fields.borrow_mut().insert(name.to_string(), value);
        Ok(())
    }

    /// Invoke a declared method with this instance as receiver.
    pub fn call(&self, name: &str) -> Result<(), RuntimeError> {
        let method = self
            .behavior
            .methods
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownMethod(name.to_string()))?;
        method(self)
    }

    /// Whether a base field with this name currently exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.borrow().contains_key(name)
    }

    /// Whether this name is a declared computed field.
    pub fn has_computed(&self, name: &str) -> bool {
        self.behavior.computed.contains_key(name)
    }

    /// Snapshot of the current base fields (for renderers and tests).
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.fields.borrow().clone()
    }

    /// The behavior this instance was created from.
    pub fn behavior(&self) -> &Rc<Behavior> {
        &self.behavior
    }

    // Run a getter under the depth guard. The guard unwinds on error too,
    // so a failed nested read leaves the counter balanced.
    fn read_derived(
        &self,
        name: &str,
        derived: &DerivedField,
    ) -> Result<Value, RuntimeError> {
        if self.depth.get() >= MAX_DERIVED_DEPTH {
            return Err(RuntimeError::ComputedCycle(name.to_string()));
        }
        self.depth.set(self.depth.get() + 1);
        let result = derived.getter()(self);
        self.depth.set(self.depth.get() - 1);
        result
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("fields", &self.fields.borrow())
            .field("behavior", &self.behavior)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
