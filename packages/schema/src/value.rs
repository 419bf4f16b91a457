//! Typed prop values.
//!
//! Prop values in a page document are free-form JSON: the same slot may hold a
//! string, a number, a nested object, an array of column descriptions or the
//! source text of a function. [`PropValue`] turns that into a tagged union so
//! the compiler can dispatch exhaustively. Which shape a JSON string takes is
//! decided by the entry's declared [`ValueType`].

use crate::types::{ComponentRef, ValueType};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// A scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// The value of one prop
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Literal(Literal),
    Object(IndexMap<String, PropValue>),
    Array(Vec<PropValue>),
    FunctionSource(String),
}

impl PropValue {
    /// Build a value from JSON, using the declared type to tell function
    /// source apart from plain strings.
    pub fn from_json(value: Value, value_type: ValueType) -> Self {
        match value {
            Value::String(source) if value_type == ValueType::Function => {
                PropValue::FunctionSource(source)
            }
            other => Self::structural(other),
        }
    }

    fn structural(value: Value) -> Self {
        match value {
            Value::Null => PropValue::Literal(Literal::Null),
            Value::Bool(b) => PropValue::Literal(Literal::Bool(b)),
            Value::Number(n) => PropValue::Literal(Literal::Number(n)),
            Value::String(s) => PropValue::Literal(Literal::String(s)),
            Value::Array(items) => {
                PropValue::Array(items.into_iter().map(Self::structural).collect())
            }
            Value::Object(entries) => PropValue::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::structural(value)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PropValue::Literal(Literal::Null) => Value::Null,
            PropValue::Literal(Literal::Bool(b)) => Value::Bool(*b),
            PropValue::Literal(Literal::Number(n)) => Value::Number(n.clone()),
            PropValue::Literal(Literal::String(s)) => Value::String(s.clone()),
            PropValue::FunctionSource(source) => Value::String(source.clone()),
            PropValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            PropValue::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        PropValue::Literal(Literal::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        PropValue::Literal(Literal::Bool(value))
    }

    pub fn null() -> Self {
        PropValue::Literal(Literal::Null)
    }

    /// `{}` or `[]`
    pub fn is_empty_container(&self) -> bool {
        match self {
            PropValue::Object(entries) => entries.is_empty(),
            PropValue::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Literal(Literal::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up an object entry
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        match self {
            PropValue::Object(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Name of the runtime shape, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropValue::Literal(Literal::Null) => "null",
            PropValue::Literal(Literal::Bool(_)) => "boolean",
            PropValue::Literal(Literal::Number(_)) => "number",
            PropValue::Literal(Literal::String(_)) => "string",
            PropValue::Object(_) => "object",
            PropValue::Array(_) => "array",
            PropValue::FunctionSource(_) => "function",
        }
    }

    /// Whether the literal shape agrees with the declared type. `null` agrees
    /// with everything; function props may carry template objects.
    pub fn matches_type(&self, value_type: ValueType) -> bool {
        match (self, value_type) {
            (PropValue::Literal(Literal::Null), _) => true,
            (PropValue::Literal(Literal::String(_)), ValueType::String) => true,
            (PropValue::Literal(Literal::Number(_)), ValueType::Number) => true,
            (PropValue::Literal(Literal::Bool(_)), ValueType::Boolean) => true,
            (PropValue::Object(_), ValueType::Object) => true,
            (PropValue::Array(_), ValueType::Array) => true,
            (PropValue::FunctionSource(_), ValueType::Function) => true,
            (PropValue::Object(_) | PropValue::Array(_), ValueType::Function) => true,
            _ => false,
        }
    }

    /// Interpret the value as template content: a component ref, a text
    /// leaf, or an array of those.
    pub fn as_component_refs(&self) -> Option<Vec<ComponentRef>> {
        match self {
            PropValue::Literal(Literal::String(text)) => Some(vec![ComponentRef::text(text)]),
            PropValue::FunctionSource(text) => Some(vec![ComponentRef::text(text)]),
            PropValue::Object(entries) if entries.contains_key("current") => {
                serde_json::from_value(self.to_json()).ok().map(|r| vec![r])
            }
            PropValue::Array(items) => {
                let mut refs = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        PropValue::Array(_) => return None,
                        other => refs.extend(other.as_component_refs()?),
                    }
                }
                Some(refs)
            }
            _ => None,
        }
    }
}

impl From<Value> for PropValue {
    fn from(value: Value) -> Self {
        PropValue::structural(value)
    }
}

impl Serialize for PropValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(PropValue::structural)
    }
}
