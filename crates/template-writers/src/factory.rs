use std::io::Write;

use tracing::debug;

use crate::config::WriterConfig;
use crate::format::OutputFormat;
use crate::json::{GeoJsonWriter, JsonLdWriter};
use crate::writer::TemplateOutputWriter;
use crate::xml::{GmlVersion, GmlWriter, XhtmlWriter};

/// Build the writer for `format` on top of `sink`.
pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    sink: W,
    config: &WriterConfig,
) -> Box<dyn TemplateOutputWriter + 'a> {
    debug!(?format, "creating template writer");
    if let Some(version) = GmlVersion::from_format(format) {
        return Box::new(GmlWriter::new(sink, version, config.gml_options()));
    }
    match format {
        OutputFormat::JsonLd => Box::new(JsonLdWriter::new(sink, config.jsonld_options())),
        OutputFormat::Xhtml => Box::new(XhtmlWriter::new(sink)),
        _ => Box::new(GeoJsonWriter::new(sink, config.geojson_options())),
    }
}
