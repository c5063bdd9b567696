//! Template model - Declarative node trees.
//!
//! A template is an immutable tree of [`Node`]s produced by a template
//! module and owned by its component definition. Nodes carry a type tag
//! (e.g. `"div"`, `"text"`), class names, event bindings (event name →
//! method name), and attributes that are either literals or zero-argument
//! accessors evaluated against the live instance.
//!
//! # Example
//!
//! ```ignore
//! use weft::component::template::Node;
//!
//! let template = Node::new("div")
//!     .on("click", "update")
//!     .child(
//!         Node::new("text")
//!             .class("title")
//!             .attr_with("value", |instance| instance.get("fullName")),
//!     );
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::instance::Instance;
use crate::types::Value;

// =============================================================================
// Attributes
// =============================================================================

/// Accessor attribute: evaluated against the instance on every read.
pub type AttrAccessor = Rc<dyn Fn(&Instance) -> Result<Value, RuntimeError>>;

/// An attribute value: a literal, or an accessor re-evaluated per read.
#[derive(Clone)]
pub enum AttrValue {
    /// Fixed value baked into the template.
    Literal(Value),
    /// Computed from current instance state each time it is read.
    Accessor(AttrAccessor),
}

impl AttrValue {
    /// Evaluate against an instance.
    ///
    /// Literal attributes ignore the instance; accessors are pure reads of
    /// current state (they create no side effects in the container).
    pub fn evaluate(&self, instance: &Instance) -> Result<Value, RuntimeError> {
        match self {
            AttrValue::Literal(value) => Ok(value.clone()),
            AttrValue::Accessor(accessor) => accessor(instance),
        }
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Literal(value) => write!(f, "Literal({value:?})"),
            AttrValue::Accessor(_) => write!(f, "Accessor(..)"),
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::Literal(value)
    }
}

// =============================================================================
// Node
// =============================================================================

/// A template element.
///
/// Immutable after the component definition is registered; the builder
/// methods below are for template-module construction only.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Type tag the renderer understands (e.g. "div", "text").
    pub node_type: String,
    /// Class names resolved against the definition's style sheet.
    pub class_list: Vec<String>,
    /// Event name → handler method name.
    pub events: HashMap<String, String>,
    /// Attribute name → literal or accessor.
    pub attrs: HashMap<String, AttrValue>,
    /// Ordered children.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node with the given type tag.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Self::default()
        }
    }

    /// Append a class name.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class_list.push(class.into());
        self
    }

    /// Bind an event name to a handler method name.
    pub fn on(mut self, event: impl Into<String>, method: impl Into<String>) -> Self {
        self.events.insert(event.into(), method.into());
        self
    }

    /// Set a literal attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs
            .insert(name.into(), AttrValue::Literal(value.into()));
        self
    }

    /// Set an accessor attribute, re-evaluated against the instance on
    /// every read.
    pub fn attr_with(
        mut self,
        name: impl Into<String>,
        accessor: impl Fn(&Instance) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.attrs
            .insert(name.into(), AttrValue::Accessor(Rc::new(accessor)));
        self
    }

    /// Append a child node.
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Handler method name bound to `event`, if any.
    pub fn event_handler(&self, event: &str) -> Option<&str> {
        self.events.get(event).map(String::as_str)
    }

    /// Evaluate the named attribute against an instance.
    ///
    /// Returns `Ok(None)` when the attribute is not present on this node.
    pub fn attr_value(
        &self,
        name: &str,
        instance: &Instance,
    ) -> Result<Option<Value>, RuntimeError> {
        match self.attrs.get(name) {
            Some(attr) => attr.evaluate(instance).map(Some),
            None => Ok(None),
        }
    }

    /// Depth-first traversal, parent before children.
    pub fn walk(&self, visit: &mut impl FnMut(&Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
