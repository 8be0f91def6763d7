//! Encoding logic shared by the GeoJSON and JSON-LD writers.

use std::io::Write;

use serde_json::Map;
use tracing::{debug, trace};

use feature_common::{
    format_iso8601, AxisOrder, EncodingHints, GeometryValue, Number, Value, WriterResult,
};

use crate::geometry::{to_wkt, with_axis_order};
use crate::json::generator::JsonGenerator;
use crate::writer::{OutputState, StaticContent};

/// How geometries are encoded in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryEncoding {
    /// A GeoJSON geometry object.
    #[default]
    GeoJson,
    /// A WKT string.
    Wkt,
}

/// Options of the JSON family writers.
#[derive(Debug, Clone)]
pub struct JsonOptions {
    /// The response holds one feature rather than a collection.
    pub single_feature_request: bool,
    /// Explode multi-valued fields into `key_1`, `key_2`, ... .
    pub flat_output: bool,
    /// Separator joining nested keys of flattened static content.
    pub flat_separator: String,
    pub geometry_encoding: GeometryEncoding,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            single_feature_request: false,
            flat_output: false,
            flat_separator: "_".to_string(),
            geometry_encoding: GeometryEncoding::GeoJson,
        }
    }
}

/// Shared JSON writer core; the format writers wrap it.
pub struct CommonJsonWriter<W: Write> {
    pub(crate) generator: JsonGenerator<W>,
    pub(crate) state: OutputState,
    pub(crate) options: JsonOptions,
    closed: bool,
}

impl<W: Write> CommonJsonWriter<W> {
    pub fn new(out: W, options: JsonOptions) -> Self {
        Self {
            generator: JsonGenerator::new(out),
            state: OutputState::default(),
            options,
            closed: false,
        }
    }

    pub fn options(&self) -> &JsonOptions {
        &self.options
    }

    pub fn is_single_feature_request(&self) -> bool {
        self.options.single_feature_request
    }

    fn skips_object(&self, hints: &EncodingHints) -> bool {
        hints.skip_object_encoding && self.options.single_feature_request
    }

    pub fn write_element_name(&mut self, name: Option<&str>) -> WriterResult<()> {
        if let Some(name) = name {
            self.generator.write_field_name(name)?;
        }
        Ok(())
    }

    pub fn start_object(&mut self, name: Option<&str>, hints: &EncodingHints) -> WriterResult<()> {
        if self.skips_object(hints) {
            debug!(?name, "inlining object without its own braces");
            return Ok(());
        }
        self.write_element_name(name)?;
        self.generator.write_start_object()
    }

    pub fn end_object(&mut self, hints: &EncodingHints) -> WriterResult<()> {
        if self.skips_object(hints) {
            return Ok(());
        }
        self.generator.write_end_object()
    }

    pub fn start_array(&mut self, name: Option<&str>) -> WriterResult<()> {
        self.write_element_name(name)?;
        self.generator.write_start_array()
    }

    pub fn end_array(&mut self) -> WriterResult<()> {
        self.generator.write_end_array()
    }

    /// Dispatch a named value on its kind.
    pub fn write_element_name_and_value(
        &mut self,
        name: Option<&str>,
        value: &Value,
    ) -> WriterResult<()> {
        if value.is_null() {
            self.write_element_name(name)?;
            return self.generator.write_null();
        }
        match value {
            Value::Attribute(attribute) => self.write_element_name_and_value(name, &attribute.value),
            Value::Complex(complex) => self.write_element_name_and_value(name, &complex.value()),
            Value::List(items) if items.len() == 1 => {
                self.write_element_name_and_value(name, &items[0])
            }
            Value::List(items) | Value::Array(items) => self.write_repeated(name, items),
            Value::Geometry(geometry) => {
                self.write_element_name(name)?;
                self.write_geometry(geometry)
            }
            _ => {
                self.write_element_name(name)?;
                self.write_value(value)
            }
        }
    }

    fn write_repeated(&mut self, name: Option<&str>, items: &[Value]) -> WriterResult<()> {
        match name {
            Some(key) if self.options.flat_output => {
                trace!(key, count = items.len(), "flattening repeated value");
                for (i, item) in items.iter().enumerate() {
                    let flat_key = format!("{}_{}", key, i + 1);
                    self.write_element_name_and_value(Some(&flat_key), item)?;
                }
                Ok(())
            }
            _ => {
                self.start_array(name)?;
                for item in items {
                    self.write_element_name_and_value(None, item)?;
                }
                self.end_array()
            }
        }
    }

    /// Leaf serializer for a value already known not to need list handling.
    pub fn write_value(&mut self, value: &Value) -> WriterResult<()> {
        match value {
            Value::Null => self.generator.write_null(),
            Value::Bool(b) => self.generator.write_bool(*b),
            Value::Number(n) => self.write_number(n),
            Value::String(s) => self.generator.write_string(s),
            Value::Date(d) => self.generator.write_string(&format_iso8601(d)),
            Value::Geometry(g) => self.write_geometry(g),
            Value::List(items) | Value::Array(items) => {
                self.generator.write_start_array()?;
                for item in items {
                    self.write_value(item)?;
                }
                self.generator.write_end_array()
            }
            Value::Attribute(attribute) => self.write_value(&attribute.value),
            Value::Complex(complex) => self.write_value(&complex.value()),
            Value::Node(node) => self.write_value_node(node),
        }
    }

    fn write_number(&mut self, number: &Number) -> WriterResult<()> {
        match number {
            Number::Int(v) => self.generator.write_i64(*v),
            Number::UInt(v) => self.generator.write_u64(*v),
            Number::Float(v) => self.generator.write_f32(*v),
            Number::Double(v) => self.generator.write_f64(*v),
        }
    }

    pub fn write_geometry(&mut self, value: &GeometryValue) -> WriterResult<()> {
        match self.options.geometry_encoding {
            GeometryEncoding::GeoJson => {
                let ordered = with_axis_order(&value.geometry, self.state.axis_order());
                let geometry = geojson::Geometry::new(geojson::Value::from(&*ordered));
                let node = serde_json::to_value(&geometry)?;
                self.write_value_node(&node)
            }
            GeometryEncoding::Wkt => self.generator.write_string(&to_wkt(value)),
        }
    }

    /// Write literal template content; objects and arrays are flattened in
    /// flat output mode.
    pub fn write_static_content(
        &mut self,
        name: Option<&str>,
        content: &StaticContent,
    ) -> WriterResult<()> {
        let node = match content {
            StaticContent::Json(node) => node,
            StaticContent::Text(text) => {
                self.write_element_name(name)?;
                return self.generator.write_string(text);
            }
        };
        if self.options.flat_output {
            let separator = self.options.flat_separator.clone();
            match (name, node) {
                (Some(key), serde_json::Value::Object(map)) => {
                    return self.write_object_node_flat(Some(key), map, &separator)
                }
                (Some(key), serde_json::Value::Array(items)) => {
                    return self.write_array_node_flat(key, items, &separator)
                }
                _ => {}
            }
        }
        self.write_element_name(name)?;
        self.write_value_node(node)
    }

    /// Re-emit a JSON tree node by node.
    pub fn write_value_node(&mut self, node: &serde_json::Value) -> WriterResult<()> {
        match node {
            serde_json::Value::Object(map) => self.write_object_node(map),
            serde_json::Value::Array(items) => self.write_array_node(items),
            serde_json::Value::Null => self.generator.write_null(),
            serde_json::Value::Bool(b) => self.generator.write_bool(*b),
            serde_json::Value::String(s) => self.generator.write_string(s),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    self.generator.write_i64(v)
                } else if let Some(v) = n.as_u64() {
                    self.generator.write_u64(v)
                } else {
                    self.generator.write_f64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
        }
    }

    pub fn write_object_node(&mut self, map: &Map<String, serde_json::Value>) -> WriterResult<()> {
        self.generator.write_start_object()?;
        for (key, value) in map {
            self.generator.write_field_name(key)?;
            self.write_value_node(value)?;
        }
        self.generator.write_end_object()
    }

    pub fn write_array_node(&mut self, items: &[serde_json::Value]) -> WriterResult<()> {
        self.generator.write_start_array()?;
        for item in items {
            self.write_value_node(item)?;
        }
        self.generator.write_end_array()
    }

    /// Write the members of an object as top level fields named
    /// `<parent><separator><key>`.
    pub fn write_object_node_flat(
        &mut self,
        parent_key: Option<&str>,
        map: &Map<String, serde_json::Value>,
        separator: &str,
    ) -> WriterResult<()> {
        for (key, value) in map {
            let flat_key = match parent_key {
                Some(parent) => format!("{}{}{}", parent, separator, key),
                None => key.clone(),
            };
            self.write_flat_entry(&flat_key, value, separator)?;
        }
        Ok(())
    }

    /// Write the elements of an array as top level fields named
    /// `<parent>_<index>`, 1-based.
    pub fn write_array_node_flat(
        &mut self,
        parent_key: &str,
        items: &[serde_json::Value],
        separator: &str,
    ) -> WriterResult<()> {
        for (i, item) in items.iter().enumerate() {
            let flat_key = format!("{}_{}", parent_key, i + 1);
            self.write_flat_entry(&flat_key, item, separator)?;
        }
        Ok(())
    }

    fn write_flat_entry(
        &mut self,
        key: &str,
        value: &serde_json::Value,
        separator: &str,
    ) -> WriterResult<()> {
        match value {
            serde_json::Value::Object(map) => self.write_object_node_flat(Some(key), map, separator),
            serde_json::Value::Array(items) => self.write_array_node_flat(key, items, separator),
            leaf => {
                self.generator.write_field_name(key)?;
                self.write_value_node(leaf)
            }
        }
    }

    pub fn axis_order(&self) -> AxisOrder {
        self.state.axis_order()
    }

    pub fn close(&mut self) -> WriterResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.generator.flush()
    }

    pub fn into_inner(self) -> W {
        self.generator.into_inner()
    }
}
