//! JSON-LD writer.
//!
//! Same structure as GeoJSON plus an `@context` member, a configurable
//! collection `type` and field name, and optional WKT geometries. Collection
//! metadata is not part of JSON-LD output and is never written.

use std::io::Write;

use tracing::debug;

use feature_common::{BoundingBox, EncodingHints, Value, WriterResult};

use crate::json::common::{CommonJsonWriter, JsonOptions};
use crate::writer::{OutputState, StaticContent, TemplateOutputWriter};

pub const DEFAULT_TYPE: &str = "FeatureCollection";
pub const DEFAULT_COLLECTION_NAME: &str = "features";

pub struct JsonLdWriter<W: Write> {
    inner: CommonJsonWriter<W>,
}

impl<W: Write> JsonLdWriter<W> {
    pub fn new(out: W, options: JsonOptions) -> Self {
        Self {
            inner: CommonJsonWriter::new(out, options),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write> TemplateOutputWriter for JsonLdWriter<W> {
    fn state(&self) -> &OutputState {
        &self.inner.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.inner.state
    }

    fn start_template_output(&mut self, hints: &EncodingHints) -> WriterResult<()> {
        self.inner.generator.write_start_object()?;
        if let Some(context) = &hints.context {
            self.inner.generator.write_field_name("@context")?;
            self.inner.write_value_node(context)?;
        }
        if self.inner.is_single_feature_request() {
            return Ok(());
        }
        let type_ = hints.jsonld_type.as_deref().unwrap_or(DEFAULT_TYPE);
        let collection = hints
            .collection_name
            .as_deref()
            .unwrap_or(DEFAULT_COLLECTION_NAME);
        let generator = &mut self.inner.generator;
        generator.write_string_field("type", type_)?;
        generator.write_field_name(collection)?;
        generator.write_start_array()
    }

    fn end_template_output(&mut self, _hints: &EncodingHints) -> WriterResult<()> {
        if !self.inner.is_single_feature_request() {
            self.inner.generator.write_end_array()?;
        }
        self.inner.generator.write_end_object()
    }

    fn start_object(&mut self, name: Option<&str>, hints: &EncodingHints) -> WriterResult<()> {
        self.inner.start_object(name, hints)
    }

    fn end_object(&mut self, _name: Option<&str>, hints: &EncodingHints) -> WriterResult<()> {
        self.inner.end_object(hints)
    }

    fn start_array(&mut self, name: Option<&str>, _hints: &EncodingHints) -> WriterResult<()> {
        self.inner.start_array(name)
    }

    fn end_array(&mut self, _name: Option<&str>, _hints: &EncodingHints) -> WriterResult<()> {
        self.inner.end_array()
    }

    fn write_element_name(
        &mut self,
        name: Option<&str>,
        _hints: &EncodingHints,
    ) -> WriterResult<()> {
        self.inner.write_element_name(name)
    }

    fn write_element_value(&mut self, value: &Value, _hints: &EncodingHints) -> WriterResult<()> {
        self.inner.write_element_name_and_value(None, value)
    }

    fn write_element_name_and_value(
        &mut self,
        name: Option<&str>,
        value: &Value,
        _hints: &EncodingHints,
    ) -> WriterResult<()> {
        self.inner.write_element_name_and_value(name, value)
    }

    fn write_static_content(
        &mut self,
        name: Option<&str>,
        content: &StaticContent,
        _hints: &EncodingHints,
    ) -> WriterResult<()> {
        self.inner.write_static_content(name, content)
    }

    fn write_collection_counts(&mut self, _feature_count: Option<u64>) -> WriterResult<()> {
        Ok(())
    }

    fn write_crs(&mut self) -> WriterResult<()> {
        Ok(())
    }

    fn write_time_stamp(&mut self) -> WriterResult<()> {
        Ok(())
    }

    fn write_collection_bounds(&mut self, _bounds: &BoundingBox) -> WriterResult<()> {
        debug!("bounds are not encoded in JSON-LD");
        Ok(())
    }

    fn write_number_returned(&mut self) -> WriterResult<()> {
        Ok(())
    }

    fn close(&mut self) -> WriterResult<()> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::common::GeometryEncoding;
    use feature_common::GeometryValue;
    use serde_json::json;

    fn output(writer: JsonLdWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_context_type_and_collection_name() {
        let hints = EncodingHints::default()
            .with_context(json!({"@vocab": "http://schema.org/"}))
            .with_jsonld_type("schema:ItemList")
            .with_collection_name("itemListElement");
        let mut writer = JsonLdWriter::new(Vec::new(), JsonOptions::default());
        writer.start_template_output(&hints).unwrap();
        writer.write_collection_counts(Some(3)).unwrap();
        writer.write_number_returned().unwrap();
        writer.end_template_output(&hints).unwrap();
        assert_eq!(
            output(writer),
            r#"{"@context":{"@vocab":"http://schema.org/"},"type":"schema:ItemList","itemListElement":[]}"#
        );
    }

    #[test]
    fn test_defaults_without_context() {
        let hints = EncodingHints::default();
        let mut writer = JsonLdWriter::new(Vec::new(), JsonOptions::default());
        writer.start_template_output(&hints).unwrap();
        writer.end_template_output(&hints).unwrap();
        assert_eq!(output(writer), r#"{"type":"FeatureCollection","features":[]}"#);
    }

    #[test]
    fn test_single_feature_inlines_skipped_object() {
        let options = JsonOptions {
            single_feature_request: true,
            ..JsonOptions::default()
        };
        let root = EncodingHints::default().with_context(json!("http://ctx"));
        let skip = EncodingHints::default().skip_object_encoding();
        let plain = EncodingHints::default();
        let mut writer = JsonLdWriter::new(Vec::new(), options);
        writer.start_template_output(&root).unwrap();
        writer.start_object(None, &skip).unwrap();
        writer
            .write_element_name_and_value(Some("@id"), &Value::from("st.1"), &plain)
            .unwrap();
        writer.start_object(Some("geology"), &skip).unwrap();
        writer
            .write_element_name_and_value(Some("name"), &Value::from("clay"), &plain)
            .unwrap();
        writer.end_object(Some("geology"), &skip).unwrap();
        writer.end_object(None, &skip).unwrap();
        writer.end_template_output(&root).unwrap();
        assert_eq!(
            output(writer),
            r#"{"@context":"http://ctx","@id":"st.1","name":"clay"}"#
        );
    }

    #[test]
    fn test_geometry_as_wkt() {
        let options = JsonOptions {
            geometry_encoding: GeometryEncoding::Wkt,
            ..JsonOptions::default()
        };
        let hints = EncodingHints::default();
        let mut writer = JsonLdWriter::new(Vec::new(), options);
        writer.start_template_output(&hints).unwrap();
        writer.start_object(None, &hints).unwrap();
        let geom = GeometryValue::new(geo_types::point!(x: 3.0, y: 4.0));
        writer
            .write_element_name_and_value(Some("geometry"), &Value::from(geom), &hints)
            .unwrap();
        writer.end_object(None, &hints).unwrap();
        writer.end_template_output(&hints).unwrap();
        assert_eq!(
            output(writer),
            r#"{"type":"FeatureCollection","features":[{"geometry":"POINT(3 4)"}]}"#
        );
    }
}
