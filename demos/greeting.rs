//! Greeting Card Demo - The full runtime on a plain-text renderer.
//!
//! This demo wires three modules (template, style, script), defines the
//! component, bootstraps it, and fires a click on the root node:
//! - data fields: firstName, lastName, date
//! - computed: fullName (read-only), today (read/write, backed by date)
//! - method: update (sets today = "2016-01-01" through the setter)
//!
//! Run with: cargo run --example greeting

use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, Utc};

use weft::{
    BehaviorBuilder, ComponentDefinition, ComponentShape, Instance, ModuleExport, Node,
    Renderer, Runtime, RuntimeError, ScriptExport, StyleSheet, Value,
};

const TEMPLATE_MODULE: u32 = 336;
const STYLE_MODULE: u32 = 337;
const SCRIPT_MODULE: u32 = 338;

/// Renderer that prints the realized tree as indented text.
struct TextRenderer;

impl TextRenderer {
    fn print_node(
        &self,
        node: &Node,
        definition: &ComponentDefinition,
        instance: &Instance,
        depth: usize,
    ) -> Result<(), RuntimeError> {
        let indent = "  ".repeat(depth);
        let style = definition.style().resolve(&node.class_list);
        let value = node.attr_value("value", instance)?;

        print!("{indent}<{}", node.node_type);
        if let Some(size) = style.get("fontSize") {
            print!(" fontSize={size}");
        }
        if let Some(value) = value {
            print!("> {value}");
        } else {
            print!(">");
        }
        println!();

        for child in &node.children {
            self.print_node(child, definition, instance, depth + 1)?;
        }
        Ok(())
    }
}

impl Renderer for TextRenderer {
    fn mount(
        &mut self,
        definition: &ComponentDefinition,
        instance: &Instance,
        _props: Option<&Value>,
    ) -> Result<(), RuntimeError> {
        self.print_node(definition.template(), definition, instance, 0)
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

fn main() -> Result<(), RuntimeError> {
    let runtime = Runtime::new();

    // Template module: the greeting card tree.
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

    // Style module: one class, as the build step would emit it.
    runtime.register_module(STYLE_MODULE, |cell, _| {
        let sheet = StyleSheet::new().rule(
            "title",
            HashMap::from([("fontSize".to_string(), Value::Int(48))]),
        );
        cell.set_exports(ModuleExport::Style(Rc::new(sheet)));
        Ok(())
    });

    // Script module: data + computed + methods, exported as a default.
    runtime.register_module(SCRIPT_MODULE, |cell, _| {
        let behavior = BehaviorBuilder::new()
            .data(|| {
                HashMap::from([
                    ("firstName".to_string(), Value::from("John")),
                    ("lastName".to_string(), Value::from("Smith")),
                    ("date".to_string(), Value::Int(Utc::now().timestamp_millis())),
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

    runtime.define("greeting-card", vec![], |loader| {
        Ok(ComponentShape {
            script: loader.resolve_script(SCRIPT_MODULE)?,
            template: loader.resolve_template(TEMPLATE_MODULE)?,
            style: loader.resolve_style(STYLE_MODULE)?,
        })
    })?;

    let mut renderer = TextRenderer;
    let handle = runtime.bootstrap("greeting-card", None, &mut renderer)?;

    println!();
    println!("fullName = {}", handle.instance().get("fullName")?);
    println!("today    = {}", handle.instance().get("today")?);

    println!("\nclick → update()\n");
    handle.dispatch_root("click")?;

    renderer.mount(handle.definition(), handle.instance(), None)?;
    println!();
    println!("today    = {}", handle.instance().get("today")?);

    Ok(())
}
