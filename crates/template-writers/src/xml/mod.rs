//! XML family writers (GML 2/3.1/3.2 and XHTML).
//!
//! Both writers share the value dispatch below and differ in how geometries
//! and collection metadata are encoded.

pub mod dialect;
pub mod emitter;
pub mod gml;
pub mod xhtml;

use std::io::Write;

use tracing::trace;

use feature_common::{AttributeSink, EncodingHints, GeometryValue, Value, WriterResult};

pub use dialect::{GmlDialect, GmlVersion};
pub use emitter::XmlEmitter;
pub use gml::GmlWriter;
pub use xhtml::XhtmlWriter;

use crate::writer::StaticContent;

/// Writes a geometry into the element that is currently open.
pub(crate) trait GeometryEncoder<W: Write> {
    fn encode_geometry(
        &mut self,
        emitter: &mut XmlEmitter<W>,
        geometry: &GeometryValue,
    ) -> WriterResult<()>;
}

/// Open `name` and run the deferred children evaluation of the hints against
/// its attributes.
pub(crate) fn open_element<W: Write>(
    emitter: &mut XmlEmitter<W>,
    name: &str,
    hints: &EncodingHints,
) -> WriterResult<()> {
    emitter.start_element(name)?;
    if let Some(evaluation) = &hints.children_evaluation {
        let sink: &mut dyn AttributeSink = emitter;
        evaluation(sink)?;
    }
    Ok(())
}

/// Value dispatch shared by the XML writers.
///
/// With a name every value becomes an element (repeated for collections),
/// without one the value is written into the element that is already open.
pub(crate) fn write_value<W: Write, G: GeometryEncoder<W>>(
    emitter: &mut XmlEmitter<W>,
    encoder: &mut G,
    name: Option<&str>,
    value: &Value,
    hints: &EncodingHints,
) -> WriterResult<()> {
    if value.is_null() {
        if let (Some(name), false) = (name, hints.encode_as_attribute) {
            emitter.start_element(name)?;
            emitter.end_element()?;
        }
        return Ok(());
    }
    match value {
        Value::Attribute(attribute) => write_value(emitter, encoder, name, &attribute.value, hints),
        Value::Complex(complex) => write_value(emitter, encoder, name, &complex.value(), hints),
        Value::List(items) | Value::Array(items) => {
            for item in items {
                write_value(emitter, encoder, name, item, hints)?;
            }
            Ok(())
        }
        Value::Geometry(geometry) => match name {
            Some(name) => {
                emitter.start_element(name)?;
                encoder.encode_geometry(emitter, geometry)?;
                emitter.end_element()
            }
            None => encoder.encode_geometry(emitter, geometry),
        },
        scalar => {
            let text = scalar.as_text().unwrap_or_default();
            trace!(name = ?name, "xml scalar");
            match name {
                Some(name) if hints.encode_as_attribute => emitter.write_attribute(name, &text),
                Some(name) => emitter.write_text_element(name, &text),
                None => emitter.write_text(&text),
            }
        }
    }
}

/// Static template content is written as character data.
pub(crate) fn write_static<W: Write>(
    emitter: &mut XmlEmitter<W>,
    name: Option<&str>,
    content: &StaticContent,
) -> WriterResult<()> {
    let text = match content {
        StaticContent::Text(text) => text.clone(),
        StaticContent::Json(serde_json::Value::String(s)) => s.clone(),
        StaticContent::Json(node) => node.to_string(),
    };
    match name {
        Some(name) => emitter.write_text_element(name, &text),
        None => emitter.write_text(&text),
    }
}
