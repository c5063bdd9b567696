//! Component Definition Registry - Named component shapes.
//!
//! `define` runs a factory against the module loader to produce the
//! component's shape (script export + template + style), normalizes the
//! script export by pattern match, validates the result, and records it
//! under the component's name. Redefining a name overwrites the earlier
//! definition and emits a recoverable warning.
//!
//! Validation happens here, at definition time, not lazily at dispatch:
//! - every template event binding must name a declared method;
//! - a name declared both as a computed field and a method is rejected.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::component::behavior::{Behavior, ScriptExport};
use crate::component::template::Node;
use crate::error::RuntimeError;
use crate::instance::Instance;
use crate::loader::ModuleLoader;
use crate::types::StyleSheet;

// =============================================================================
// Definition
// =============================================================================

/// The component's shape as produced by its definition factory.
pub struct ComponentShape {
    /// Behavior, tagged by export style (normalized here).
    pub script: ScriptExport,
    /// Template tree attached to the definition.
    pub template: Rc<Node>,
    /// Style sheet attached to the definition.
    pub style: Rc<StyleSheet>,
}

/// A registered component: name, recorded dependencies, and the three
/// parts of its shape. Immutable after registration.
pub struct ComponentDefinition {
    name: String,
    dependencies: Vec<String>,
    template: Rc<Node>,
    style: Rc<StyleSheet>,
    behavior: Rc<Behavior>,
}

impl ComponentDefinition {
    /// The registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Component names this definition declared as dependencies.
    ///
    /// Recorded for forward compatibility; nothing in this runtime resolves
    /// them yet.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// The template tree.
    pub fn template(&self) -> &Rc<Node> {
        &self.template
    }

    /// The style sheet.
    pub fn style(&self) -> &Rc<StyleSheet> {
        &self.style
    }

    /// The behavior.
    pub fn behavior(&self) -> &Rc<Behavior> {
        &self.behavior
    }

    /// Create a live instance of this definition.
    pub fn instantiate(&self) -> Result<Instance, RuntimeError> {
        Instance::new(Rc::clone(&self.behavior))
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("behavior", &self.behavior)
            .finish()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Name → definition table. Owned, not ambient: each runtime carries its
/// own registry.
#[derive(Default)]
pub struct ComponentRegistry {
    definitions: RefCell<HashMap<String, Rc<ComponentDefinition>>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a component.
    ///
    /// The factory resolves whatever modules it needs through `loader` and
    /// returns the component's shape. The script export is normalized by
    /// pattern match, the shape is validated, and the definition is stored
    /// under `name`. An existing definition of the same name is overwritten
    /// with a warning.
    pub fn define(
        &self,
        loader: &ModuleLoader,
        name: impl Into<String>,
        dependencies: Vec<String>,
        factory: impl FnOnce(&ModuleLoader) -> Result<ComponentShape, RuntimeError>,
    ) -> Result<Rc<ComponentDefinition>, RuntimeError> {
        let name = name.into();
        let shape = factory(loader)?;
        let behavior = shape.script.into_behavior();

        behavior.validate_names()?;
        validate_event_bindings(&name, &shape.template, &behavior)?;

        let definition = Rc::new(ComponentDefinition {
            name: name.clone(),
            dependencies,
            template: shape.template,
            style: shape.style,
            behavior,
        });

        let mut definitions = self.definitions.borrow_mut();
        if definitions.contains_key(&name) {
            tracing::warn!(component = %name, "redefining component; previous definition replaced");
        }
        definitions.insert(name, Rc::clone(&definition));
        Ok(definition)
    }

    /// Look up a definition by name.
    pub fn lookup(&self, name: &str) -> Option<Rc<ComponentDefinition>> {
        self.definitions.borrow().get(name).cloned()
    }

    /// Whether a name is defined.
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.borrow().contains_key(name)
    }

    /// Number of defined components.
    pub fn len(&self) -> usize {
        self.definitions.borrow().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.borrow().is_empty()
    }
}

// Fail fast on handler names the behavior does not declare.
fn validate_event_bindings(
    component: &str,
    template: &Node,
    behavior: &Behavior,
) -> Result<(), RuntimeError> {
    let mut dangling = None;
    template.walk(&mut |node| {
        if dangling.is_some() {
            return;
        }
        for (event, method) in &node.events {
            if !behavior.has_method(method) {
                dangling = Some(RuntimeError::DanglingHandler {
                    component: component.to_string(),
                    event: event.clone(),
                    method: method.clone(),
                });
                return;
            }
        }
    });
    match dangling {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================
