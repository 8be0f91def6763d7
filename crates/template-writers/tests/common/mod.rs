//! Drivers that walk sample features through a writer the way a template
//! evaluator would.

use feature_common::{BoundingBox, EncodingHints, Value};
use template_writers::TemplateOutputWriter;
use test_utils::SampleFeature;

/// `{"type":"Feature","id":..,"properties":{..},"geometry":..}`
pub fn write_json_feature(
    writer: &mut dyn TemplateOutputWriter,
    feature: &SampleFeature,
    hints: &EncodingHints,
) {
    let plain = EncodingHints::default();
    writer.start_object(None, hints).unwrap();
    writer
        .write_element_name_and_value(Some("type"), &Value::from("Feature"), &plain)
        .unwrap();
    let properties = feature.properties();
    let (geometry, rest) = properties.split_last().unwrap();
    let (id, rest) = rest.split_first().unwrap();
    writer
        .write_element_name_and_value(Some(id.0), &id.1, &plain)
        .unwrap();
    writer.start_object(Some("properties"), &plain).unwrap();
    for (name, value) in rest {
        writer
            .write_element_name_and_value(Some(*name), value, &plain)
            .unwrap();
    }
    writer.end_object(Some("properties"), &plain).unwrap();
    writer
        .write_element_name_and_value(Some(geometry.0), &geometry.1, &plain)
        .unwrap();
    writer.end_object(None, hints).unwrap();
    writer.increment_number_returned();
}

/// One feature member holding a `type_name` element with prefixed properties.
pub fn write_xml_feature(
    writer: &mut dyn TemplateOutputWriter,
    type_name: &str,
    feature: &SampleFeature,
) {
    let hints = EncodingHints::default();
    writer.start_object(None, &hints).unwrap();
    writer.start_object(Some(type_name), &hints).unwrap();
    for (name, value) in feature.properties() {
        let element = format!("st:{}", name);
        writer
            .write_element_name_and_value(Some(&element), &value, &hints)
            .unwrap();
    }
    writer.end_object(Some(type_name), &hints).unwrap();
    writer.end_object(None, &hints).unwrap();
    writer.increment_number_returned();
}

/// Envelope of all sample feature geometries.
pub fn bounds_of(features: &[SampleFeature]) -> BoundingBox {
    features
        .iter()
        .filter_map(|f| BoundingBox::of_geometry(&f.geometry.geometry))
        .reduce(|mut total, b| {
            total.expand_to_include(&b);
            total
        })
        .unwrap()
}
