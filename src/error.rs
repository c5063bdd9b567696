//! Runtime errors.
//!
//! One taxonomy for the whole runtime. Failures inside user-supplied
//! closures (`data`, getters, setters, methods, definition factories)
//! propagate through these as-is; the runtime never retries, suppresses,
//! or logs them on the caller's behalf.

use thiserror::Error;

use crate::loader::ModuleId;

/// Errors produced by the loader, the component registry, instantiation,
/// and dispatch.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Resolution was requested for a module id that was never registered.
    /// Fatal for the resolution chain: no module can partially initialize
    /// on top of a missing dependency.
    #[error("unknown module id {0}")]
    UnknownModule(ModuleId),

    /// A module exported a different shape than the wiring point expected
    /// (e.g. a style sheet where a template was required).
    #[error("module {id} exports {found}, expected {expected}")]
    ModuleKind {
        id: ModuleId,
        expected: &'static str,
        found: &'static str,
    },

    /// Bootstrap was requested for a component name that is not defined.
    #[error("unknown component {0:?}")]
    UnknownComponent(String),

    /// A template event binding names a method the behavior does not
    /// declare. Caught at definition time.
    #[error("component {component:?}: event {event:?} is bound to undeclared method {method:?}")]
    DanglingHandler {
        component: String,
        event: String,
        method: String,
    },

    /// The same name is declared in more than one kind (data field,
    /// computed field, method). Caught at definition or instantiation time.
    #[error("field name {name:?} is declared both as {first} and {second}")]
    FieldCollision {
        name: String,
        first: &'static str,
        second: &'static str,
    },

    /// A computed getter transitively depends on itself.
    #[error("computed field {0:?} exceeded the derived-read depth limit (likely a cycle)")]
    ComputedCycle(String),

    /// Read of a field name that is neither a base field nor a computed
    /// field on the instance.
    #[error("unknown field {0:?}")]
    UnknownField(String),

    /// Write to a computed field that has no setter.
    #[error("computed field {0:?} is read-only")]
    ReadOnlyField(String),

    /// Invocation of a method name the behavior does not declare.
    #[error("unknown method {0:?}")]
    UnknownMethod(String),

    /// A user-supplied closure failed. Carries the closure's own message.
    #[error("{context}: {message}")]
    User {
        context: &'static str,
        message: String,
    },
}

impl RuntimeError {
    /// Wrap a failure from a user-supplied closure.
    pub fn user(context: &'static str, message: impl Into<String>) -> Self {
        RuntimeError::User {
            context,
            message: message.into(),
        }
    }
}
