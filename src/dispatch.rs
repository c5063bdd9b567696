//! Event Dispatch - Node event bindings to instance methods.
//!
//! The template tree itself carries the bindings (event name → method
//! name), so there is no listener registry: dispatch looks the handler up
//! on the node at fire time and invokes the named method with the instance
//! as receiver. An event with no binding on the node is silently ignored.
//!
//! Handler names are validated when the component is defined
//! ([`crate::component::ComponentRegistry::define`]), so dispatch on a
//! registered definition cannot hit a dangling method name.

use crate::component::template::Node;
use crate::error::RuntimeError;
use crate::instance::Instance;

/// Outcome of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A bound method ran.
    Handled,
    /// The node has no binding for this event; nothing happened.
    Ignored,
}

impl Dispatch {
    /// Whether a handler actually ran.
    pub fn was_handled(&self) -> bool {
        matches!(self, Dispatch::Handled)
    }
}

/// Fire `event` on `node` against `instance`.
///
/// Looks up `node.events[event]`; if present, invokes that method with the
/// instance as receiver and no further arguments. If absent, returns
/// [`Dispatch::Ignored`] without touching instance state. Method failures
/// propagate unmodified.
pub fn dispatch(
    instance: &Instance,
    node: &Node,
    event: &str,
) -> Result<Dispatch, RuntimeError> {
    match node.event_handler(event) {
        Some(method) => {
            instance.call(method)?;
            Ok(Dispatch::Handled)
        }
        None => Ok(Dispatch::Ignored),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::rc::Rc;

    use crate::component::behavior::BehaviorBuilder;
    use crate::types::Value;

    fn counter_instance() -> Instance {
        let behavior = BehaviorBuilder::new()
            .data(|| HashMap::from([("count".to_string(), Value::Int(0))]))
            .method("bump", |i| {
                let count = i.get("count")?.as_int().unwrap_or(0);
                i.set("count", Value::Int(count + 1))
            })
            .build()
            .unwrap();
        Instance::new(Rc::new(behavior)).unwrap()
    }

    #[test]
    fn test_bound_event_invokes_method() {
        let instance = counter_instance();
        let node = Node::new("div").on("click", "bump");

        let outcome = dispatch(&instance, &node, "click").unwrap();
        assert!(outcome.was_handled());
        assert_eq!(instance.get("count").unwrap(), Value::Int(1));

        dispatch(&instance, &node, "click").unwrap();
        assert_eq!(instance.get("count").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_unbound_event_is_a_no_op() {
        let instance = counter_instance();
        let node = Node::new("div").on("click", "bump");

        let outcome = dispatch(&instance, &node, "longpress").unwrap();
        assert_eq!(outcome, Dispatch::Ignored);
        // State untouched.
        assert_eq!(instance.get("count").unwrap(), Value::Int(0));
    }

    #[test]
    fn test_method_errors_propagate() {
        let behavior = BehaviorBuilder::new()
            .method("fail", |_| Err(RuntimeError::user("method", "refused")))
            .build()
            .unwrap();
        let instance = Instance::new(Rc::new(behavior)).unwrap();
        let node = Node::new("div").on("click", "fail");

        let err = dispatch(&instance, &node, "click").unwrap_err();
        assert!(matches!(err, RuntimeError::User { .. }));
    }
}
