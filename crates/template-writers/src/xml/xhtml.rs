//! Minimal XHTML writer: an `<html>` shell whose head is filled from the
//! root hints and whose body mirrors the template structure.

use std::io::Write;

use tracing::debug;

use feature_common::{BoundingBox, EncodingHints, GeometryValue, HintValue, Value, WriterResult};

use crate::geometry::to_ewkt;
use crate::writer::{OutputState, StaticContent, TemplateOutputWriter};
use crate::xml::emitter::XmlEmitter;
use crate::xml::{open_element, write_static, write_value, GeometryEncoder};

/// Hint keys with this prefix carry the attributes of a head `<link>`.
pub const LINK_HINT_PREFIX: &str = "link";

/// Geometries as text: EWKT when the SRID is known, WKT otherwise.
struct EwktText;

impl<W: Write> GeometryEncoder<W> for EwktText {
    fn encode_geometry(
        &mut self,
        emitter: &mut XmlEmitter<W>,
        geometry: &GeometryValue,
    ) -> WriterResult<()> {
        emitter.write_text(&to_ewkt(geometry))
    }
}

pub struct XhtmlWriter<W: Write> {
    emitter: XmlEmitter<W>,
    state: OutputState,
    pending_name: Option<String>,
    closed: bool,
}

impl<W: Write> XhtmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            emitter: XmlEmitter::new(out),
            state: OutputState::default(),
            pending_name: None,
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.emitter.into_inner()
    }

    fn write_head(&mut self, hints: &EncodingHints) -> WriterResult<()> {
        self.emitter.start_element("head")?;
        for script in &hints.scripts {
            self.emitter.write_text_element("script", script)?;
        }
        for style in &hints.styles {
            self.emitter.write_text_element("style", style)?;
        }
        for (key, value) in hints.extensions_with_prefix(LINK_HINT_PREFIX) {
            match value {
                HintValue::Attributes(attributes) if !attributes.is_empty() => {
                    self.emitter.start_element("link")?;
                    for attribute in attributes {
                        self.emitter
                            .write_attribute(&attribute.local_name, &attribute.value)?;
                    }
                    self.emitter.end_element()?;
                }
                _ => debug!(hint = key, "link hint without attributes ignored"),
            }
        }
        self.emitter.end_element()
    }
}

impl<W: Write> TemplateOutputWriter for XhtmlWriter<W> {
    fn state(&self) -> &OutputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.state
    }

    fn start_template_output(&mut self, hints: &EncodingHints) -> WriterResult<()> {
        self.emitter.start_element("html")?;
        self.write_head(hints)?;
        self.emitter.start_element("body")
    }

    fn end_template_output(&mut self, _hints: &EncodingHints) -> WriterResult<()> {
        self.emitter.end_element()?;
        self.emitter.end_element()?;
        self.emitter.flush()
    }

    fn start_object(&mut self, name: Option<&str>, hints: &EncodingHints) -> WriterResult<()> {
        match name {
            Some(name) => open_element(&mut self.emitter, name, hints),
            None => Ok(()),
        }
    }

    fn end_object(&mut self, name: Option<&str>, _hints: &EncodingHints) -> WriterResult<()> {
        match name {
            Some(_) => self.emitter.end_element(),
            None => Ok(()),
        }
    }

    fn start_array(&mut self, _name: Option<&str>, _hints: &EncodingHints) -> WriterResult<()> {
        Ok(())
    }

    fn end_array(&mut self, _name: Option<&str>, _hints: &EncodingHints) -> WriterResult<()> {
        Ok(())
    }

    fn write_element_name(
        &mut self,
        name: Option<&str>,
        _hints: &EncodingHints,
    ) -> WriterResult<()> {
        self.pending_name = name.map(str::to_string);
        Ok(())
    }

    fn write_element_value(&mut self, value: &Value, hints: &EncodingHints) -> WriterResult<()> {
        let name = self.pending_name.take();
        write_value(&mut self.emitter, &mut EwktText, name.as_deref(), value, hints)
    }

    fn write_element_name_and_value(
        &mut self,
        name: Option<&str>,
        value: &Value,
        hints: &EncodingHints,
    ) -> WriterResult<()> {
        write_value(&mut self.emitter, &mut EwktText, name, value, hints)
    }

    fn write_static_content(
        &mut self,
        name: Option<&str>,
        content: &StaticContent,
        _hints: &EncodingHints,
    ) -> WriterResult<()> {
        write_static(&mut self.emitter, name, content)
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
        Ok(())
    }

    fn write_number_returned(&mut self) -> WriterResult<()> {
        Ok(())
    }

    fn close(&mut self) -> WriterResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.emitter.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_common::{WriterError, XmlAttribute};
    use geo_types::point;
    use test_utils::geometries;

    fn output(writer: XhtmlWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_head() {
        let hints = EncodingHints::default();
        let mut writer = XhtmlWriter::new(Vec::new());
        writer.start_template_output(&hints).unwrap();
        writer.write_collection_counts(Some(1)).unwrap();
        writer.write_number_returned().unwrap();
        writer.end_template_output(&hints).unwrap();
        assert_eq!(output(writer), "<html><head></head><body></body></html>");
    }

    #[test]
    fn test_head_scripts_styles_links() {
        let hints = EncodingHints::default()
            .with_script("var a = 1;")
            .with_style("td { color: red }")
            .with_extension(
                "linkCss",
                HintValue::Attributes(vec![
                    XmlAttribute::new("rel", "stylesheet"),
                    XmlAttribute::new("href", "style.css"),
                ]),
            )
            .with_extension("linkEmpty", HintValue::Attributes(vec![]))
            .with_extension("other", HintValue::Text("x".to_string()));
        let mut writer = XhtmlWriter::new(Vec::new());
        writer.start_template_output(&hints).unwrap();
        writer.end_template_output(&hints).unwrap();
        assert_eq!(
            output(writer),
            "<html><head><script>var a = 1;</script><style>td { color: red }</style>\
             <link rel=\"stylesheet\" href=\"style.css\"></link></head><body></body></html>"
        );
    }

    #[test]
    fn test_body_structure_and_ewkt() {
        let hints = EncodingHints::default();
        let mut writer = XhtmlWriter::new(Vec::new());
        writer.start_template_output(&hints).unwrap();
        writer.start_object(None, &hints).unwrap();
        writer.start_object(Some("table"), &hints).unwrap();
        writer.start_array(Some("rows"), &hints).unwrap();
        writer
            .write_element_name_and_value(Some("td"), &Value::List(vec![Value::from(1), Value::from(2)]), &hints)
            .unwrap();
        writer.end_array(Some("rows"), &hints).unwrap();
        writer.write_element_name(Some("td"), &hints).unwrap();
        let geom = GeometryValue::new(point!(x: 1.0, y: 2.0)).with_srid(4326);
        writer.write_element_value(&Value::from(geom), &hints).unwrap();
        writer.end_object(Some("table"), &hints).unwrap();
        writer.end_object(None, &hints).unwrap();
        writer.write_crs().unwrap();
        writer.end_template_output(&hints).unwrap();
        assert_eq!(
            output(writer),
            "<html><head></head><body><table><td>1</td><td>2</td>\
             <td>SRID=4326;POINT(1 2)</td></table></body></html>"
        );
    }

    #[test]
    fn test_class_attribute_after_child_is_error() {
        let hints = EncodingHints::default();
        let mut writer = XhtmlWriter::new(Vec::new());
        writer.start_object(Some("div"), &hints).unwrap();
        writer
            .write_element_name_and_value(Some("span"), &Value::from("text"), &hints)
            .unwrap();
        let err = writer
            .write_element_name_and_value(
                Some("class"),
                &Value::from("station"),
                &EncodingHints::default().encode_as_attribute(),
            )
            .unwrap_err();
        assert!(matches!(err, WriterError::Xml(_)));
    }

    #[test]
    fn test_singleton_list_matches_scalar() {
        let values = [
            Value::from("text"),
            Value::from(2.5),
            Value::from(GeometryValue::new(geometries::station_point()).with_srid(4326)),
        ];
        for value in values {
            let encode = |v: &Value| {
                let hints = EncodingHints::default();
                let mut writer = XhtmlWriter::new(Vec::new());
                writer
                    .write_element_name_and_value(Some("td"), v, &hints)
                    .unwrap();
                output(writer)
            };
            let single = Value::List(vec![value.clone()]);
            assert_eq!(encode(&single), encode(&value), "{:?}", value);
        }
    }
}
