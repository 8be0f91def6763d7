//! Feature values handed to the writers by the template evaluator.
//!
//! Every value a template can produce is one of the [`Value`] variants, so a
//! writer decides how to encode it with a single exhaustive match.

use chrono::{DateTime, FixedOffset, Utc};
use geo_types::Geometry;
use std::fmt;

/// Numeric value, keeping the width it was read with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
}

impl Number {
    pub fn is_floating(&self) -> bool {
        matches!(self, Number::Float(_) | Number::Double(_))
    }
}

impl fmt::Display for Number {
    /// Floating values keep a fractional part (`3.0`, not `3`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::UInt(v) => write!(f, "{}", v),
            Number::Float(v) => write_floating(f, f64::from(*v), &v.to_string()),
            Number::Double(v) => write_floating(f, *v, &v.to_string()),
        }
    }
}

fn write_floating(f: &mut fmt::Formatter<'_>, value: f64, text: &str) -> fmt::Result {
    if value.is_finite() && value.fract() == 0.0 && !text.contains('e') && !text.contains('.') {
        write!(f, "{}.0", text)
    } else {
        f.write_str(text)
    }
}

/// A geometry together with the spatial metadata the encoders need.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryValue {
    pub geometry: Geometry<f64>,
    /// Spatial reference id, zero or negative when unknown.
    pub srid: i32,
    /// Multi-polygons that are semantically multi-surfaces.
    pub multi_surface: bool,
}

impl GeometryValue {
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            geometry: geometry.into(),
            srid: 0,
            multi_surface: false,
        }
    }

    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }

    pub fn as_multi_surface(mut self) -> Self {
        self.multi_surface = true;
        self
    }
}

/// A named property of a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: Value,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A property whose value is itself a set of properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexAttribute {
    pub name: String,
    pub properties: Vec<Attribute>,
}

impl ComplexAttribute {
    pub fn new(name: impl Into<String>, properties: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// The wrapped value: the list of the nested property values.
    pub fn value(&self) -> Value {
        Value::List(
            self.properties
                .iter()
                .map(|p| Value::Attribute(Box::new(p.clone())))
                .collect(),
        )
    }
}

/// A value produced for one template node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<FixedOffset>),
    Geometry(GeometryValue),
    /// A collection; a single element collapses to the element itself.
    List(Vec<Value>),
    /// A native array; always encoded as an array, even with one element.
    Array(Vec<Value>),
    Attribute(Box<Attribute>),
    Complex(ComplexAttribute),
    /// Already structured content, e.g. a parsed JSON subtree.
    Node(serde_json::Value),
}

impl Value {
    /// Build a native array value.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// Null, `""`, `"null"`, empty lists and empty arrays all count as null.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty() || s == "null",
            Value::List(items) | Value::Array(items) => items.is_empty(),
            Value::Node(serde_json::Value::Null) => true,
            _ => false,
        }
    }

    /// Text form used by the XML writers for scalar values.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Date(d) => Some(crate::time::format_iso8601(d)),
            Value::Node(serde_json::Value::String(s)) => Some(s.clone()),
            Value::Node(node) if !node.is_null() => Some(node.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(Number::Int(i64::from(v)))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(Number::Int(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Number(Number::UInt(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(Number::Float(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(Number::Double(v))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Date(v.fixed_offset())
    }
}

impl From<GeometryValue> for Value {
    fn from(v: GeometryValue) -> Self {
        Value::Geometry(v)
    }
}

impl From<Geometry<f64>> for Value {
    fn from(v: Geometry<f64>) -> Self {
        Value::Geometry(GeometryValue::new(v))
    }
}

impl From<Attribute> for Value {
    fn from(v: Attribute) -> Self {
        Value::Attribute(Box::new(v))
    }
}

impl From<ComplexAttribute> for Value {
    fn from(v: ComplexAttribute) -> Self {
        Value::Complex(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Node(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
