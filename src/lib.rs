//! # weft
//!
//! Reactive component runtime: a numeric-id module loader, a named
//! component registry, a derived-on-read state container, and template
//! event dispatch.
//!
//! ## Architecture
//!
//! ```text
//! ModuleLoader ──resolve──▶ template / style / script exports
//!        │
//!        ▼
//! ComponentRegistry::define ──▶ ComponentDefinition (validated, immutable)
//!        │
//!        ▼
//! Runtime::bootstrap ──▶ Instance ──dispatch──▶ methods ──▶ field mutation
//!                            │
//!                            └── computed fields re-derived on every read
//! ```
//!
//! Everything is explicitly owned: a [`Runtime`] carries its own loader and
//! registry, so independent runtimes coexist in one process and tests never
//! share state. Execution is single-threaded and synchronous; no operation
//! blocks or yields.
//!
//! Rendering is not here. A [`Renderer`] implementation receives the
//! template tree, style sheet, and live instance at bootstrap and realizes
//! nodes however its platform requires.
//!
//! ## Modules
//!
//! - [`types`] - `Value` scalar and `StyleSheet`
//! - [`loader`] - module registry with exactly-once evaluation
//! - [`component`] - templates, behaviors, the definition registry
//! - [`instance`] - the reactive state container
//! - [`dispatch`] - event → method resolution
//! - [`runtime`] - owned registries and bootstrap

pub mod component;
pub mod dispatch;
pub mod error;
pub mod instance;
pub mod loader;
pub mod runtime;
pub mod types;

// Re-export commonly used items
pub use types::{StyleRule, StyleSheet, Value};

pub use error::RuntimeError;

pub use loader::{ModuleCell, ModuleExport, ModuleId, ModuleInit, ModuleLoader};

pub use component::{
    AttrValue, Behavior, BehaviorBuilder, ComponentDefinition, ComponentRegistry,
    ComponentShape, DerivedField, Node, ScriptExport,
};

pub use instance::{Instance, MAX_DERIVED_DEPTH};

pub use dispatch::{dispatch, Dispatch};

pub use runtime::{ComponentHandle, Renderer, Runtime};
