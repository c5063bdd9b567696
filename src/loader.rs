//! Module Loader - Numeric-id module registry with exactly-once evaluation.
//!
//! Modules are the units the build step emits: a template tree, a style
//! sheet, a behavior script, or a plain value, each keyed by a numeric id.
//! The loader owns a definition table (id → defining function) and a cache
//! (id → evaluated module). Resolution is memoized: a defining function
//! runs at most once per loader, including under diamond-shaped and
//! re-entrant dependency graphs.
//!
//! # Re-entrancy
//!
//! The cache entry is created *before* the defining function runs, so a
//! module whose dependencies circle back to it observes its own partial
//! exports instead of recursing forever. This matches the loader the build
//! step targets.
//!
//! # API
//!
//! - `register(id, init)` - Record a defining function (build time)
//! - `resolve(id)` - Evaluate-or-return-cached exports
//! - `resolve_template / resolve_style / resolve_script` - Typed coercions
//! - `is_loaded(id)` - Inspect the loaded flag
//! - `evaluations()` - How many defining functions have run (test support)

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::component::ScriptExport;
use crate::component::template::Node;
use crate::error::RuntimeError;
use crate::types::{StyleSheet, Value};

// =============================================================================
// Types
// =============================================================================

/// Module identifier, assigned by the build step.
pub type ModuleId = u32;

/// A module's defining function.
///
/// Invoked at most once per loader with the module's own cell (to populate
/// exports) and the loader itself (for transitive resolution).
pub type ModuleInit = Rc<dyn Fn(&ModuleCell, &ModuleLoader) -> Result<(), RuntimeError>>;

/// The exported value of an evaluated module.
#[derive(Clone)]
pub enum ModuleExport {
    /// No exports set yet (visible to re-entrant resolution mid-evaluation).
    None,
    /// A plain scalar.
    Value(Value),
    /// A template tree.
    Template(Rc<Node>),
    /// A style sheet.
    Style(Rc<StyleSheet>),
    /// A behavior script (possibly wrapped in a default-export marker).
    Script(ScriptExport),
}

impl ModuleExport {
    /// Short name of the export shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ModuleExport::None => "nothing",
            ModuleExport::Value(_) => "a value",
            ModuleExport::Template(_) => "a template",
            ModuleExport::Style(_) => "a style sheet",
            ModuleExport::Script(_) => "a script",
        }
    }
}

impl fmt::Debug for ModuleExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleExport::None => write!(f, "None"),
            ModuleExport::Value(v) => write!(f, "Value({v:?})"),
            ModuleExport::Template(_) => write!(f, "Template(..)"),
            ModuleExport::Style(s) => write!(f, "Style({} classes)", s.len()),
            ModuleExport::Script(_) => write!(f, "Script(..)"),
        }
    }
}

/// A module under (or after) evaluation: its exports slot and loaded flag.
pub struct ModuleCell {
    id: ModuleId,
    exports: RefCell<ModuleExport>,
    loaded: Cell<bool>,
}

impl ModuleCell {
    fn new(id: ModuleId) -> Self {
        Self {
            id,
            exports: RefCell::new(ModuleExport::None),
            loaded: Cell::new(false),
        }
    }

    /// This module's id.
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Replace the module's exports. Defining functions call this.
    pub fn set_exports(&self, exports: ModuleExport) {
        *self.exports.borrow_mut() = exports;
    }

    /// Current exports (cheap clone; export payloads are behind `Rc`).
    pub fn exports(&self) -> ModuleExport {
        self.exports.borrow().clone()
    }

    /// Whether the defining function has finished.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Module registry and loader.
///
/// Owned (not ambient): each runtime carries its own loader, so independent
/// runtimes and tests never share module state.
#[derive(Default)]
pub struct ModuleLoader {
    definitions: RefCell<HashMap<ModuleId, ModuleInit>>,
    cache: RefCell<HashMap<ModuleId, Rc<ModuleCell>>>,
    evaluations: Cell<usize>,
}

impl ModuleLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a defining function for `id`.
    ///
    /// Re-registering an id replaces the defining function; if the module
    /// was already resolved the cache wins and the replacement never runs.
    pub fn register(
        &self,
        id: ModuleId,
        init: impl Fn(&ModuleCell, &ModuleLoader) -> Result<(), RuntimeError> + 'static,
    ) {
        self.definitions.borrow_mut().insert(id, Rc::new(init));
    }

    /// Resolve a module id to its exports.
    ///
    /// First call per id evaluates the defining function; every later call
    /// returns the cached exports without re-evaluating. A defining
    /// function that fails is evicted from the cache, so a later `resolve`
    /// of the same id runs it again: exactly-once applies to successful
    /// evaluation, and a failure never masquerades as a resolved module.
    pub fn resolve(&self, id: ModuleId) -> Result<ModuleExport, RuntimeError> {
        let cached = self.cache.borrow().get(&id).cloned();
        if let Some(cell) = cached {
            return Ok(cell.exports());
        }

        let init = self
            .definitions
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(RuntimeError::UnknownModule(id))?;

        // Cache before evaluating so re-entrant resolution of this id sees
        // the partial exports instead of recursing.
        let cell = Rc::new(ModuleCell::new(id));
        self.cache.borrow_mut().insert(id, Rc::clone(&cell));

        self.evaluations.set(self.evaluations.get() + 1);
        tracing::debug!(module = id, "evaluating module");

        if let Err(err) = init(&cell, self) {
            // A failed module must not masquerade as resolved.
            self.cache.borrow_mut().remove(&id);
            return Err(err);
        }

        cell.loaded.set(true);
        Ok(cell.exports())
    }

    /// Resolve `id` and require a template export.
    pub fn resolve_template(&self, id: ModuleId) -> Result<Rc<Node>, RuntimeError> {
        match self.resolve(id)? {
            ModuleExport::Template(node) => Ok(node),
            other => Err(RuntimeError::ModuleKind {
                id,
                expected: "a template",
                found: other.kind(),
            }),
        }
    }

    /// Resolve `id` and require a style-sheet export.
    pub fn resolve_style(&self, id: ModuleId) -> Result<Rc<StyleSheet>, RuntimeError> {
        match self.resolve(id)? {
            ModuleExport::Style(sheet) => Ok(sheet),
            other => Err(RuntimeError::ModuleKind {
                id,
                expected: "a style sheet",
                found: other.kind(),
            }),
        }
    }

    /// Resolve `id` and require a script export.
    pub fn resolve_script(&self, id: ModuleId) -> Result<ScriptExport, RuntimeError> {
        match self.resolve(id)? {
            ModuleExport::Script(script) => Ok(script),
            other => Err(RuntimeError::ModuleKind {
                id,
                expected: "a script",
                found: other.kind(),
            }),
        }
    }

    /// Whether `id` has been resolved to completion.
    pub fn is_loaded(&self, id: ModuleId) -> bool {
        self.cache
            .borrow()
            .get(&id)
            .map(|cell| cell.is_loaded())
            .unwrap_or(false)
    }

    /// Number of registered definitions.
    pub fn registered_count(&self) -> usize {
        self.definitions.borrow().len()
    }

    /// How many defining functions have run on this loader.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }
}

// =============================================================================
// Tests
// =============================================================================
