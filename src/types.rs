//! Core types for weft.
//!
//! These types define the foundation that everything builds on.
//! `Value` is the dynamic scalar that flows through data fields, computed
//! fields, node attributes, and style properties. `StyleSheet` is the
//! class → property → value table the renderer consumes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Value
// =============================================================================

/// A dynamic scalar value.
///
/// Component state is untyped at the field level: a `data` initializer
/// returns a map of names to `Value`s, computed getters produce `Value`s,
/// and node attributes evaluate to `Value`s. Style sheets use the same
/// scalar for property values (e.g. `fontSize: 48`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent / null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer (also used for epoch-millisecond timestamps).
    Int(i64),
    /// Floating point.
    Float(f64),
    /// String.
    Str(String),
}

impl Value {
    /// Borrow as `&str` if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract as `i64` if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract as `f64` if this is numeric (int or float).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract as `bool` if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Check for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

// =============================================================================
// StyleSheet
// =============================================================================

/// Style properties for a single class: property name → value.
pub type StyleRule = HashMap<String, Value>;

/// A component's style table: class name → rule.
///
/// Produced by a style module and attached to the component definition at
/// registration time; immutable thereafter. The renderer resolves a node's
/// `class_list` against this table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet {
    classes: HashMap<String, StyleRule>,
}

impl StyleSheet {
    /// Create an empty style sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule for a class (builder style).
    pub fn rule(mut self, class: impl Into<String>, rule: StyleRule) -> Self {
        self.classes.insert(class.into(), rule);
        self
    }

    /// Look up the rule for a class.
    pub fn class(&self, class: &str) -> Option<&StyleRule> {
        self.classes.get(class)
    }

    /// Look up a single property on a class.
    pub fn property(&self, class: &str, property: &str) -> Option<&Value> {
        self.classes.get(class).and_then(|rule| rule.get(property))
    }

    /// Number of classes in the sheet.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the sheet has no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Resolve a class list into a merged rule.
    ///
    /// Classes are applied in list order; a later class overrides properties
    /// set by an earlier one.
    pub fn resolve(&self, class_list: &[String]) -> StyleRule {
        let mut merged = StyleRule::new();
        for class in class_list {
            if let Some(rule) = self.classes.get(class) {
                for (property, value) in rule {
                    merged.insert(property.clone(), value.clone());
                }
            }
        }
        merged
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(48), Value::Int(48));
        assert_eq!(Value::from("title"), Value::Str("title".to_string()));
        assert_eq!(Value::from(1.5).as_float(), Some(1.5));
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("John").to_string(), "John");
        assert_eq!(Value::Int(48).to_string(), "48");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_stylesheet_lookup() {
        let sheet = StyleSheet::new()
            .rule("title", StyleRule::from([("fontSize".to_string(), Value::Int(48))]));

        assert_eq!(sheet.property("title", "fontSize"), Some(&Value::Int(48)));
        assert_eq!(sheet.property("title", "color"), None);
        assert_eq!(sheet.property("body", "fontSize"), None);
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn test_stylesheet_resolve_order() {
        let sheet = StyleSheet::new()
            .rule(
                "base",
                StyleRule::from([
                    ("fontSize".to_string(), Value::Int(12)),
                    ("bold".to_string(), Value::Bool(false)),
                ]),
            )
            .rule(
                "title",
                StyleRule::from([("fontSize".to_string(), Value::Int(48))]),
            );

        let merged = sheet.resolve(&["base".to_string(), "title".to_string()]);
        assert_eq!(merged.get("fontSize"), Some(&Value::Int(48)));
        assert_eq!(merged.get("bold"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_stylesheet_from_json() {
        let sheet: StyleSheet =
            serde_json::from_str(r#"{"title": {"fontSize": 48}}"#).unwrap();
        assert_eq!(sheet.property("title", "fontSize"), Some(&Value::Int(48)));
    }
}
