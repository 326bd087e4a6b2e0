//! Outbound payload shaping.
//!
//! Entities serialize with every modeled property, `null`s included; this
//! module decides what actually goes over the wire. The walk operates on the
//! scalar/object/list shape of [`serde_json::Value`]:
//!
//! - top level: drop `null` properties, rebuild nested structures and keep
//!   them only when non-empty;
//! - nested levels: additionally drop integer-valued fields that are
//!   exactly 0.
//!
//! Which entity sets are shaped at all is an explicit policy table, not a
//! type switch — business partner payloads pass through unfiltered by
//! default because the server distinguishes "absent" from "zero" for them.

use std::collections::HashSet;

use serde_json::{Map, Number, Value};

/// Shaping rule for one entity set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Apply the null / zero / empty filter before sending.
    Filtered,
    /// Send the serialized payload as-is.
    Passthrough,
}

/// Per-entity-set inclusion policy.
#[derive(Debug, Clone)]
pub struct ShapingPolicy {
    passthrough: HashSet<String>,
}

impl Default for ShapingPolicy {
    fn default() -> Self {
        Self::new(["BusinessPartners".to_string()])
    }
}

impl ShapingPolicy {
    /// Build a policy where the named entity sets bypass shaping.
    pub fn new(passthrough_types: impl IntoIterator<Item = String>) -> Self {
        Self { passthrough: passthrough_types.into_iter().collect() }
    }

    /// Rule applied to payloads addressed at `entity_set`.
    pub fn rule_for(&self, entity_set: &str) -> Shape {
        if self.passthrough.contains(entity_set) {
            Shape::Passthrough
        } else {
            Shape::Filtered
        }
    }

    /// Shape `payload` according to the rule for `entity_set`.
    pub fn apply(&self, entity_set: &str, payload: Value) -> Value {
        match self.rule_for(entity_set) {
            Shape::Passthrough => payload,
            Shape::Filtered => shape_value(payload),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    Top,
    Nested,
}

fn shape_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(shape_object(map, Level::Top)),
        other => other,
    }
}

fn shape_object(map: Map<String, Value>, level: Level) -> Map<String, Value> {
    let mut shaped = Map::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Number(number) if level == Level::Nested && is_zero_integer(&number) => {}
            Value::Object(inner) => {
                let rebuilt = shape_object(inner, Level::Nested);
                if !rebuilt.is_empty() {
                    shaped.insert(key, Value::Object(rebuilt));
                }
            }
            Value::Array(items) => {
                let rebuilt = shape_array(items);
                if !rebuilt.is_empty() {
                    shaped.insert(key, Value::Array(rebuilt));
                }
            }
            scalar => {
                shaped.insert(key, scalar);
            }
        }
    }
    shaped
}

fn shape_array(items: Vec<Value>) -> Vec<Value> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Null => None,
            Value::Object(inner) => {
                let rebuilt = shape_object(inner, Level::Nested);
                (!rebuilt.is_empty()).then(|| Value::Object(rebuilt))
            }
            other => Some(other),
        })
        .collect()
}

/// Integer zero only; a float `0.0` is a deliberate value and survives.
fn is_zero_integer(number: &Number) -> bool {
    number.as_i64() == Some(0) || number.as_u64() == Some(0)
}
