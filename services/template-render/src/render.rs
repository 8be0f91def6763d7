//! Flat template walk over the input features.
//!
//! The JSON family writes collection metadata after the features. The XML
//! family carries it on the root element, so it is written first and the
//! returned count is known up front.

use tracing::{debug, info};

use feature_common::{BoundingBox, Crs, EncodingHints, Value, WriterResult};
use template_writers::{OutputFormat, TemplateOutputWriter};

use crate::input::InputFeature;

/// Per-run options of the flat template.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Qualified GML feature type name, e.g. `st:Station`.
    pub type_name: String,
    pub crs: Option<Crs>,
    /// Total matched features, when it differs from the rendered ones.
    pub number_matched: Option<u64>,
    pub single_feature: bool,
    /// JSON-LD `@context` written on the root.
    pub context: Option<serde_json::Value>,
}

impl RenderOptions {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            type_name: "feature:Feature".to_string(),
            crs: None,
            number_matched: None,
            single_feature: false,
            context: None,
        }
    }

    fn root_hints(&self) -> EncodingHints {
        match &self.context {
            Some(context) if self.format == OutputFormat::JsonLd => {
                EncodingHints::default().with_context(context.clone())
            }
            _ => EncodingHints::default(),
        }
    }

    fn feature_hints(&self) -> EncodingHints {
        if self.single_feature {
            EncodingHints::default().skip_object_encoding()
        } else {
            EncodingHints::default()
        }
    }

    /// Prefix of the type name, used to qualify property elements.
    fn prefix(&self) -> Option<&str> {
        self.type_name.split_once(':').map(|(prefix, _)| prefix)
    }

    fn qualified(&self, name: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{}:{}", prefix, name),
            None => name.to_string(),
        }
    }
}

/// Envelope of all feature geometries, `None` when there are none.
pub fn collection_bounds(features: &[InputFeature]) -> Option<BoundingBox> {
    features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .filter_map(|g| BoundingBox::of_geometry(&g.geometry))
        .reduce(|mut total, b| {
            total.expand_to_include(&b);
            total
        })
}

/// Run one full response through `writer`. The caller closes it.
pub fn render_features(
    writer: &mut dyn TemplateOutputWriter,
    features: &[InputFeature],
    options: &RenderOptions,
) -> WriterResult<()> {
    let root = options.root_hints();
    let metadata_first = !options.format.is_json();
    writer.set_crs(options.crs.clone());

    if metadata_first {
        for _ in features {
            writer.increment_number_returned();
        }
    }
    writer.start_template_output(&root)?;
    if metadata_first {
        write_metadata(writer, features, options)?;
    }

    for feature in features {
        match options.format {
            OutputFormat::GeoJson | OutputFormat::JsonLd => {
                write_json_feature(writer, feature, options)?
            }
            OutputFormat::Gml2 | OutputFormat::Gml31 | OutputFormat::Gml32 => {
                write_gml_feature(writer, feature, options)?
            }
            OutputFormat::Xhtml => write_html_feature(writer, feature)?,
        }
        if !metadata_first {
            writer.increment_number_returned();
        }
    }

    if !metadata_first {
        write_metadata(writer, features, options)?;
    }
    writer.end_template_output(&root)?;
    info!(
        format = ?options.format,
        features = writer.number_returned(),
        "rendered features"
    );
    Ok(())
}

fn write_metadata(
    writer: &mut dyn TemplateOutputWriter,
    features: &[InputFeature],
    options: &RenderOptions,
) -> WriterResult<()> {
    let matched = options.number_matched.unwrap_or(features.len() as u64);
    writer.write_number_returned()?;
    writer.write_collection_counts(Some(matched))?;
    writer.write_time_stamp()?;
    if writer.crs().is_some() {
        writer.write_crs()?;
    }
    match collection_bounds(features) {
        Some(bounds) => writer.write_collection_bounds(&bounds),
        None => {
            debug!("no geometries, bounds skipped");
            Ok(())
        }
    }
}

fn write_json_feature(
    writer: &mut dyn TemplateOutputWriter,
    feature: &InputFeature,
    options: &RenderOptions,
) -> WriterResult<()> {
    let hints = EncodingHints::default();
    let feature_hints = options.feature_hints();
    writer.start_object(None, &feature_hints)?;
    writer.write_element_name_and_value(Some("type"), &Value::from("Feature"), &hints)?;
    if let Some(id) = &feature.id {
        writer.write_element_name_and_value(Some("id"), &Value::from(id.as_str()), &hints)?;
    }
    writer.start_object(Some("properties"), &hints)?;
    for (name, value) in &feature.properties {
        writer.write_element_name_and_value(Some(name), value, &hints)?;
    }
    writer.end_object(Some("properties"), &hints)?;
    let geometry = match &feature.geometry {
        Some(geometry) => Value::Geometry(geometry.clone()),
        None => Value::Null,
    };
    writer.write_element_name_and_value(Some("geometry"), &geometry, &hints)?;
    writer.end_object(None, &feature_hints)
}

fn write_gml_feature(
    writer: &mut dyn TemplateOutputWriter,
    feature: &InputFeature,
    options: &RenderOptions,
) -> WriterResult<()> {
    let hints = EncodingHints::default();
    writer.start_object(None, &hints)?;
    writer.start_object(Some(&options.type_name), &hints)?;
    if let Some(id) = &feature.id {
        let as_attribute = EncodingHints::default().encode_as_attribute();
        writer.write_element_name_and_value(Some("gml:id"), &Value::from(id.as_str()), &as_attribute)?;
    }
    for (name, value) in &feature.properties {
        writer.write_element_name_and_value(Some(&options.qualified(name)), value, &hints)?;
    }
    if let Some(geometry) = &feature.geometry {
        writer.write_element_name_and_value(
            Some(&options.qualified("geometry")),
            &Value::Geometry(geometry.clone()),
            &hints,
        )?;
    }
    writer.end_object(Some(&options.type_name), &hints)?;
    writer.end_object(None, &hints)
}

fn write_html_feature(writer: &mut dyn TemplateOutputWriter, feature: &InputFeature) -> WriterResult<()> {
    let hints = EncodingHints::default();
    writer.start_object(Some("div"), &hints)?;
    if let Some(id) = &feature.id {
        writer.write_element_name_and_value(Some("h2"), &Value::from(id.as_str()), &hints)?;
    }
    writer.start_object(Some("ul"), &hints)?;
    for (name, value) in &feature.properties {
        match value.as_text() {
            Some(text) => writer.write_element_name_and_value(
                Some("li"),
                &Value::from(format!("{}: {}", name, text)),
                &hints,
            )?,
            None => writer.write_element_name_and_value(Some("li"), value, &hints)?,
        }
    }
    if let Some(geometry) = &feature.geometry {
        writer.write_element_name_and_value(Some("li"), &Value::Geometry(geometry.clone()), &hints)?;
    }
    writer.end_object(Some("ul"), &hints)?;
    writer.end_object(Some("div"), &hints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_common::GeometryValue;
    use template_writers::{create_writer, WriterConfig};

    fn features() -> Vec<InputFeature> {
        vec![
            InputFeature {
                id: Some("a.1".to_string()),
                properties: vec![("name".to_string(), Value::from("first"))],
                geometry: Some(GeometryValue::new(geo_types::Point::new(1.0, 2.0))),
            },
            InputFeature {
                id: Some("a.2".to_string()),
                properties: vec![("name".to_string(), Value::from("second"))],
                geometry: Some(GeometryValue::new(geo_types::Point::new(3.0, 4.0))),
            },
        ]
    }

    fn render(options: &RenderOptions, config: &WriterConfig, features: &[InputFeature]) -> String {
        let mut out = Vec::new();
        {
            let mut writer = create_writer(options.format, &mut out, config);
            render_features(&mut *writer, features, options).unwrap();
            writer.close().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_collection_bounds() {
        assert_eq!(
            collection_bounds(&features()),
            Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0))
        );
        assert_eq!(collection_bounds(&[]), None);
    }

    #[test]
    fn test_geojson_metadata_after_features() {
        let options = RenderOptions::new(OutputFormat::GeoJson);
        let out = render(&options, &WriterConfig::default(), &features());
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["features"][1]["id"], "a.2");
        assert_eq!(doc["features"][0]["geometry"]["coordinates"], serde_json::json!([1.0, 2.0]));
        assert_eq!(doc["numberReturned"], 2);
        assert_eq!(doc["numberMatched"], 2);
        assert_eq!(doc["bbox"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));
        assert!(doc.get("crs").is_none());
    }

    #[test]
    fn test_geojson_single_feature() {
        let mut options = RenderOptions::new(OutputFormat::GeoJson);
        options.single_feature = true;
        let config = WriterConfig {
            single_feature_request: true,
            ..WriterConfig::default()
        };
        let out = render(&options, &config, &features()[..1]);
        assert_eq!(
            out,
            r#"{"type":"Feature","id":"a.1","properties":{"name":"first"},"geometry":{"type":"Point","coordinates":[1.0,2.0]}}"#
        );
    }

    #[test]
    fn test_gml_counts_on_root() {
        let mut options = RenderOptions::new(OutputFormat::Gml32);
        options.type_name = "st:Station".to_string();
        options.number_matched = Some(10);
        let out = render(&options, &WriterConfig::default(), &features());
        assert!(out.contains(r#"numberReturned="2" numberMatched="10""#));
        assert!(out.contains(r#"<st:Station gml:id="a.1"><st:name>first</st:name>"#));
        assert!(out.contains(r#"gml:id="Station.2.geom""#));
    }

    #[test]
    fn test_html_list() {
        let options = RenderOptions::new(OutputFormat::Xhtml);
        let out = render(&options, &WriterConfig::default(), &features()[..1]);
        assert_eq!(
            out,
            "<html><head></head><body><div><h2>a.1</h2><ul><li>name: first</li>\
             <li>POINT(1 2)</li></ul></div></body></html>"
        );
    }
}
