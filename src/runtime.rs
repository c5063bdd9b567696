//! Runtime - Owned registries and the bootstrap entry point.
//!
//! A [`Runtime`] bundles the module loader and the component registry into
//! one explicitly-owned container. Nothing here is ambient: two runtimes in
//! the same process share no state, and tests get isolation for free by
//! constructing their own.
//!
//! # Bootstrap
//!
//! ```text
//! bootstrap(name, props, renderer)
//!     → registry lookup          (UnknownComponent if missing)
//!     → definition.instantiate() (data init + collision validation)
//!     → renderer.mount(...)      (external collaborator realizes the tree)
//!     → ComponentHandle          (live instance, accepts reads/dispatch)
//! ```
//!
//! The renderer owns its mount target; this core passes the template,
//! style, instance, and the opaque `props` through and never looks at how
//! nodes are realized.

use std::rc::Rc;

use crate::component::registry::{ComponentDefinition, ComponentRegistry, ComponentShape};
use crate::component::template::Node;
use crate::dispatch::{self, Dispatch};
use crate::error::RuntimeError;
use crate::instance::Instance;
use crate::loader::{ModuleCell, ModuleId, ModuleLoader};
use crate::types::Value;

// =============================================================================
// Renderer Seam
// =============================================================================

/// External rendering collaborator.
///
/// Realizing nodes against a platform (how a `"div"` or `"text"` maps to
/// anything visible) is outside this runtime. Implementations receive the
/// definition (template + style), the live instance (field accessors), and
/// the opaque bootstrap props.
pub trait Renderer {
    /// Realize the component against this renderer's target.
    fn mount(
        &mut self,
        definition: &ComponentDefinition,
        instance: &Instance,
        props: Option<&Value>,
    ) -> Result<(), RuntimeError>;
}

// =============================================================================
// Component Handle
// =============================================================================

/// Handle to a bootstrapped component: the definition it came from and the
/// live instance. The instance stays live for as long as the handle (or
/// any clone of its `Rc`s) exists.
#[derive(Debug)]
pub struct ComponentHandle {
    definition: Rc<ComponentDefinition>,
    instance: Rc<Instance>,
}

impl ComponentHandle {
    /// The definition this instance was created from.
    pub fn definition(&self) -> &Rc<ComponentDefinition> {
        &self.definition
    }

    /// The live instance.
    pub fn instance(&self) -> &Rc<Instance> {
        &self.instance
    }

    /// Fire an event on a node of this component's template.
    pub fn dispatch(&self, node: &Node, event: &str) -> Result<Dispatch, RuntimeError> {
        dispatch::dispatch(&self.instance, node, event)
    }

    /// Fire an event on the template root.
    pub fn dispatch_root(&self, event: &str) -> Result<Dispatch, RuntimeError> {
        self.dispatch(self.definition.template(), event)
    }
}

// =============================================================================
// Runtime
// =============================================================================

/// One self-contained runtime: module loader + component registry.
#[derive(Default)]
pub struct Runtime {
    loader: ModuleLoader,
    components: ComponentRegistry,
}

impl Runtime {
    /// Create an empty runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// The module loader.
    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    /// The component registry.
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Register a module defining function (build-time wiring).
    pub fn register_module(
        &self,
        id: ModuleId,
        init: impl Fn(&ModuleCell, &ModuleLoader) -> Result<(), RuntimeError> + 'static,
    ) {
        self.loader.register(id, init);
    }

    /// Define a component against this runtime's loader and registry.
    pub fn define(
        &self,
        name: impl Into<String>,
        dependencies: Vec<String>,
        factory: impl FnOnce(&ModuleLoader) -> Result<ComponentShape, RuntimeError>,
    ) -> Result<Rc<ComponentDefinition>, RuntimeError> {
        self.components.define(&self.loader, name, dependencies, factory)
    }

    /// Bootstrap a defined component.
    ///
    /// Looks up the definition, instantiates it, and hands the result to
    /// the renderer. `props` is an opaque pass-through for the renderer.
    pub fn bootstrap(
        &self,
        name: &str,
        props: Option<Value>,
        renderer: &mut dyn Renderer,
    ) -> Result<ComponentHandle, RuntimeError> {
        let definition = self
            .components
            .lookup(name)
            .ok_or_else(|| RuntimeError::UnknownComponent(name.to_string()))?;

        let instance = Rc::new(definition.instantiate()?);
        tracing::debug!(component = name, "bootstrapping component");

        renderer.mount(&definition, &instance, props.as_ref())?;

        Ok(ComponentHandle {
            definition,
            instance,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use chrono::{DateTime, NaiveDate};

    use crate::component::behavior::BehaviorBuilder;
    use crate::component::{ComponentShape, ScriptExport};
    use crate::loader::ModuleExport;
    use crate::types::StyleSheet;

    const TEMPLATE_MODULE: ModuleId = 336;
    const STYLE_MODULE: ModuleId = 337;
    const SCRIPT_MODULE: ModuleId = 338;

    /// Renderer that records what it was asked to mount.
    #[derive(Default)]
    struct RecordingRenderer {
        mounted: Vec<String>,
        props: Option<Value>,
    }

    impl Renderer for RecordingRenderer {
        fn mount(
            &mut self,
            definition: &ComponentDefinition,
            _instance: &Instance,
            props: Option<&Value>,
        ) -> Result<(), RuntimeError> {
            definition
                .template()
                .walk(&mut |node| self.mounted.push(node.node_type.clone()));
            self.props = props.cloned();
            Ok(())
        }
    }

    fn format_date(millis: i64) -> Result<Value, RuntimeError> {
        let stamp = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| RuntimeError::user("today getter", "timestamp out of range"))?;
        Ok(Value::Str(stamp.format("%a %b %d %Y").to_string()))
    }

    fn parse_date(text: &str) -> Result<i64, RuntimeError> {
        let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|e| RuntimeError::user("today setter", e.to_string()))?;
        Ok(date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid")
            .and_utc()
            .timestamp_millis())
    }

    /// Wire the greeting-card modules: template, style, and script, then
    /// define the component the way the generated entry module does.
    fn wire_greeting(runtime: &Runtime) {
        runtime.register_module(TEMPLATE_MODULE, |cell, _| {
            let template = Node::new("div")
                .on("click", "update")
                .child(Node::new("text").class("title").attr_with("value", |i| i.get("firstName")))
                .child(Node::new("text").class("title").attr_with("value", |i| i.get("lastName")))
                .child(Node::new("text").class("title").attr_with("value", |i| i.get("fullName")))
                .child(Node::new("text").class("title").attr_with("value", |i| i.get("today")));
            cell.set_exports(ModuleExport::Template(Rc::new(template)));
            Ok(())
        });

        runtime.register_module(STYLE_MODULE, |cell, _| {
            let sheet: StyleSheet =
                serde_json::from_str(r#"{"title": {"fontSize": 48}}"#)
                    .map_err(|e| RuntimeError::user("style module", e.to_string()))?;
            cell.set_exports(ModuleExport::Style(Rc::new(sheet)));
            Ok(())
        });

        runtime.register_module(SCRIPT_MODULE, |cell, _| {
            let behavior = BehaviorBuilder::new()
                .data(|| {
                    HashMap::from([
                        ("firstName".to_string(), Value::from("John")),
                        ("lastName".to_string(), Value::from("Smith")),
                        ("date".to_string(), Value::Int(parse_date("2015-06-15").unwrap())),
                    ])
                })
                .computed("fullName", |i| {
                    Ok(Value::Str(format!("{} {}", i.get("firstName")?, i.get("lastName")?)))
                })
                .computed_rw(
                    "today",
                    |i| {
                        let millis = i.get("date")?.as_int().ok_or_else(|| {
                            RuntimeError::user("today getter", "date is not a timestamp")
                        })?;
                        format_date(millis)
                    },
                    |i, value| {
                        let text = value.as_str().ok_or_else(|| {
                            RuntimeError::user("today setter", "expected a date string")
                        })?;
                        i.set("date", Value::Int(parse_date(text)?))
                    },
                )
                .method("update", |i| i.set("today", Value::from("2016-01-01")))
                .build()?;
            cell.set_exports(ModuleExport::Script(ScriptExport::Default(Rc::new(behavior))));
            Ok(())
        });

        runtime
            .define("greeting-card", vec![], |loader| {
                Ok(ComponentShape {
                    script: loader.resolve_script(SCRIPT_MODULE)?,
                    template: loader.resolve_template(TEMPLATE_MODULE)?,
                    style: loader.resolve_style(STYLE_MODULE)?,
                })
            })
            .unwrap();
    }

    #[test]
    fn test_bootstrap_end_to_end() {
        let runtime = Runtime::new();
        wire_greeting(&runtime);

        let mut renderer = RecordingRenderer::default();
        let handle = runtime
            .bootstrap("greeting-card", Some(Value::from("props")), &mut renderer)
            .unwrap();

        // The renderer saw the whole tree and the opaque props.
        assert_eq!(renderer.mounted, vec!["div", "text", "text", "text", "text"]);
        assert_eq!(renderer.props, Some(Value::from("props")));

        // Handles are debuggable (tests lean on this for unwrap_err).
        assert!(format!("{handle:?}").contains("greeting-card"));

        // Data and computed fields are readable through the instance.
        let instance = handle.instance();
        assert_eq!(instance.get("fullName").unwrap(), Value::from("John Smith"));
        assert_eq!(instance.get("today").unwrap(), Value::from("Mon Jun 15 2015"));

        // Style survived registration.
        assert_eq!(
            handle.definition().style().property("title", "fontSize"),
            Some(&Value::Int(48))
        );

        // Click fires `update`, whose write to `today` routes through the
        // setter into the backing `date` field.
        let outcome = handle.dispatch_root("click").unwrap();
        assert!(outcome.was_handled());
        assert_eq!(instance.get("today").unwrap(), Value::from("Fri Jan 01 2016"));
        assert_eq!(
            instance.get("date").unwrap(),
            Value::Int(parse_date("2016-01-01").unwrap())
        );

        // Accessor attributes on the template read current state.
        let root = handle.definition().template();
        assert_eq!(
            root.children[2].attr_value("value", instance).unwrap(),
            Some(Value::from("John Smith"))
        );
    }

    #[test]
    fn test_modules_evaluate_once_across_defines() {
        let runtime = Runtime::new();
        wire_greeting(&runtime);
        assert_eq!(runtime.loader().evaluations(), 3);

        // A second definition reusing the same modules re-resolves from
        // cache; nothing re-evaluates.
        runtime
            .define("greeting-card-2", vec![], |loader| {
                Ok(ComponentShape {
                    script: loader.resolve_script(SCRIPT_MODULE)?,
                    template: loader.resolve_template(TEMPLATE_MODULE)?,
                    style: loader.resolve_style(STYLE_MODULE)?,
                })
            })
            .unwrap();
        assert_eq!(runtime.loader().evaluations(), 3);
    }

    #[test]
    fn test_bootstrap_unknown_component() {
        let runtime = Runtime::new();
        let mut renderer = RecordingRenderer::default();

        let err = runtime.bootstrap("ghost", None, &mut renderer).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownComponent(name) if name == "ghost"));
        assert!(renderer.mounted.is_empty());
    }

    #[test]
    fn test_runtimes_are_isolated() {
        let a = Runtime::new();
        let b = Runtime::new();
        wire_greeting(&a);

        assert!(a.components().is_defined("greeting-card"));
        assert!(!b.components().is_defined("greeting-card"));
        assert_eq!(b.loader().evaluations(), 0);
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let runtime = Runtime::new();
        wire_greeting(&runtime);

        let mut renderer = RecordingRenderer::default();
        let first = runtime.bootstrap("greeting-card", None, &mut renderer).unwrap();
        let second = runtime.bootstrap("greeting-card", None, &mut renderer).unwrap();

        first.dispatch_root("click").unwrap();
        assert_eq!(
            first.instance().get("today").unwrap(),
            Value::from("Fri Jan 01 2016")
        );
        assert_eq!(
            second.instance().get("today").unwrap(),
            Value::from("Mon Jun 15 2015")
        );
    }
}
