//! Component system - Definitions, behaviors, templates.
//!
//! A component definition bundles three parts produced by modules:
//! - **template** - immutable node tree ([`template::Node`])
//! - **style** - class → property → value table ([`crate::types::StyleSheet`])
//! - **behavior** - data initializer, computed fields, methods
//!   ([`behavior::Behavior`])
//!
//! Definitions are registered by name in a [`registry::ComponentRegistry`]
//! and instantiated into live [`crate::instance::Instance`]s.

pub mod behavior;
pub mod registry;
pub mod template;

pub use behavior::{Behavior, BehaviorBuilder, DerivedField, ScriptExport};
pub use registry::{ComponentDefinition, ComponentRegistry, ComponentShape};
pub use template::{AttrValue, Node};
