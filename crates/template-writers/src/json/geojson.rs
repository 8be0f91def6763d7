//! GeoJSON FeatureCollection writer.

use std::io::Write;

use tracing::{debug, warn};

use feature_common::{
    time::timestamp_now, BoundingBox, EncodingHints, Link, Value, WriterResult,
};

use crate::json::common::{CommonJsonWriter, JsonOptions};
use crate::writer::{OutputState, StaticContent, TemplateOutputWriter};

/// Writes `{"type":"FeatureCollection","features":[...], ...}` documents.
///
/// Collection metadata (counts, CRS, bounds, links) goes after the features
/// array: the first metadata call closes the array.
pub struct GeoJsonWriter<W: Write> {
    inner: CommonJsonWriter<W>,
    features_open: bool,
}

impl<W: Write> GeoJsonWriter<W> {
    pub fn new(out: W, options: JsonOptions) -> Self {
        Self {
            inner: CommonJsonWriter::new(out, options),
            features_open: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }

    /// Close the features array if still open. Returns false in single
    /// feature mode, where there is no collection to attach metadata to.
    fn prepare_metadata(&mut self, what: &str) -> WriterResult<bool> {
        if self.inner.is_single_feature_request() {
            debug!(what, "collection metadata skipped for single feature request");
            return Ok(false);
        }
        if self.features_open {
            self.inner.generator.write_end_array()?;
            self.features_open = false;
        }
        Ok(true)
    }

    fn write_link_array(&mut self, links: &[Link]) -> WriterResult<()> {
        self.inner.generator.write_field_name("links")?;
        self.inner.generator.write_start_array()?;
        for link in links {
            let node = serde_json::to_value(link)?;
            self.inner.write_value_node(&node)?;
        }
        self.inner.generator.write_end_array()
    }
}

impl<W: Write> TemplateOutputWriter for GeoJsonWriter<W> {
    fn state(&self) -> &OutputState {
        &self.inner.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.inner.state
    }

    fn start_template_output(&mut self, _hints: &EncodingHints) -> WriterResult<()> {
        let generator = &mut self.inner.generator;
        generator.write_start_object()?;
        if !self.inner.options.single_feature_request {
            generator.write_string_field("type", "FeatureCollection")?;
            generator.write_field_name("features")?;
            generator.write_start_array()?;
            self.features_open = true;
        }
        Ok(())
    }

    fn end_template_output(&mut self, _hints: &EncodingHints) -> WriterResult<()> {
        if self.features_open {
            self.inner.generator.write_end_array()?;
            self.features_open = false;
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

    fn write_collection_counts(&mut self, feature_count: Option<u64>) -> WriterResult<()> {
        if !self.prepare_metadata("counts")? {
            return Ok(());
        }
        let generator = &mut self.inner.generator;
        match feature_count {
            Some(count) => {
                generator.write_number_field("totalFeatures", count)?;
                generator.write_number_field("numberMatched", count)
            }
            None => generator.write_string_field("totalFeatures", "unknown"),
        }
    }

    fn write_crs(&mut self) -> WriterResult<()> {
        if !self.prepare_metadata("crs")? {
            return Ok(());
        }
        let identifier = match self.inner.state.crs() {
            Some(crs) => crs.identifier()?,
            None => {
                warn!("no CRS set, writing null crs member");
                return self.inner.generator.write_null_field("crs");
            }
        };
        let generator = &mut self.inner.generator;
        generator.write_field_name("crs")?;
        generator.write_start_object()?;
        generator.write_string_field("type", "name")?;
        generator.write_field_name("properties")?;
        generator.write_start_object()?;
        generator.write_string_field("name", &identifier)?;
        generator.write_end_object()?;
        generator.write_end_object()
    }

    fn write_time_stamp(&mut self) -> WriterResult<()> {
        if !self.prepare_metadata("timeStamp")? {
            return Ok(());
        }
        self.inner
            .generator
            .write_string_field("timeStamp", &timestamp_now())
    }

    fn write_collection_bounds(&mut self, bounds: &BoundingBox) -> WriterResult<()> {
        if !self.prepare_metadata("bbox")? {
            return Ok(());
        }
        let axis_order = self.inner.axis_order();
        let (min_a, min_b) = bounds.lower_corner(axis_order);
        let (max_a, max_b) = bounds.upper_corner(axis_order);
        let generator = &mut self.inner.generator;
        generator.write_field_name("bbox")?;
        generator.write_start_array()?;
        for ordinate in [min_a, min_b, max_a, max_b] {
            generator.write_f64(ordinate)?;
        }
        generator.write_end_array()
    }

    fn write_number_returned(&mut self) -> WriterResult<()> {
        if !self.prepare_metadata("numberReturned")? {
            return Ok(());
        }
        let returned = self.inner.state.number_returned();
        self.inner
            .generator
            .write_number_field("numberReturned", returned)
    }

    fn write_paging_links(
        &mut self,
        mime_type: &str,
        previous: Option<&str>,
        next: Option<&str>,
    ) -> WriterResult<()> {
        if previous.is_none() && next.is_none() {
            return Ok(());
        }
        if !self.prepare_metadata("links")? {
            return Ok(());
        }
        let mut links = Vec::with_capacity(2);
        if let Some(href) = previous {
            links.push(
                Link::new(href, "previous")
                    .with_type(mime_type)
                    .with_title("previous page"),
            );
        }
        if let Some(href) = next {
            links.push(
                Link::new(href, "next")
                    .with_type(mime_type)
                    .with_title("next page"),
            );
        }
        self.write_link_array(&links)
    }

    fn write_links(&mut self, links: &[Link]) -> WriterResult<()> {
        if links.is_empty() || !self.prepare_metadata("links")? {
            return Ok(());
        }
        self.write_link_array(links)
    }

    fn close(&mut self) -> WriterResult<()> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_common::Crs;
    use serde_json::json;

    fn output(writer: GeoJsonWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    fn feature(writer: &mut GeoJsonWriter<Vec<u8>>, id: &str) {
        let hints = EncodingHints::default();
        writer.start_object(None, &hints).unwrap();
        writer
            .write_element_name_and_value(Some("type"), &Value::from("Feature"), &hints)
            .unwrap();
        writer
            .write_element_name_and_value(Some("id"), &Value::from(id), &hints)
            .unwrap();
        writer.end_object(None, &hints).unwrap();
        writer.increment_number_returned();
    }

    #[test]
    fn test_empty_collection() {
        let hints = EncodingHints::default();
        let mut writer = GeoJsonWriter::new(Vec::new(), JsonOptions::default());
        writer.start_template_output(&hints).unwrap();
        writer.end_template_output(&hints).unwrap();
        writer.close().unwrap();
        assert_eq!(output(writer), r#"{"type":"FeatureCollection","features":[]}"#);
    }

    #[test]
    fn test_collection_with_metadata() {
        let hints = EncodingHints::default();
        let mut writer = GeoJsonWriter::new(Vec::new(), JsonOptions::default());
        writer.set_crs(Some(Crs::epsg_east_north(4326)));
        writer.start_template_output(&hints).unwrap();
        feature(&mut writer, "a.1");
        feature(&mut writer, "a.2");
        writer.write_collection_counts(Some(10)).unwrap();
        writer.write_number_returned().unwrap();
        writer.write_crs().unwrap();
        writer
            .write_collection_bounds(&BoundingBox::new(1.0, 2.0, 3.0, 4.0))
            .unwrap();
        writer
            .write_paging_links("application/geo+json", None, Some("http://next"))
            .unwrap();
        writer.end_template_output(&hints).unwrap();

        let out: serde_json::Value = serde_json::from_str(&output(writer)).unwrap();
        assert_eq!(out["features"].as_array().unwrap().len(), 2);
        assert_eq!(out["totalFeatures"], 10);
        assert_eq!(out["numberMatched"], 10);
        assert_eq!(out["numberReturned"], 2);
        assert_eq!(out["crs"]["properties"]["name"], "urn:ogc:def:crs:EPSG::4326");
        assert_eq!(out["bbox"], json!([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(
            out["links"],
            json!([{"title": "next page", "type": "application/geo+json", "rel": "next", "href": "http://next"}])
        );
    }

    #[test]
    fn test_unknown_count_and_missing_crs() {
        let hints = EncodingHints::default();
        let mut writer = GeoJsonWriter::new(Vec::new(), JsonOptions::default());
        writer.start_template_output(&hints).unwrap();
        writer.write_collection_counts(None).unwrap();
        writer.write_crs().unwrap();
        writer.end_template_output(&hints).unwrap();
        assert_eq!(
            output(writer),
            r#"{"type":"FeatureCollection","features":[],"totalFeatures":"unknown","crs":null}"#
        );
    }

    #[test]
    fn test_bbox_north_east() {
        let hints = EncodingHints::default();
        let mut writer = GeoJsonWriter::new(Vec::new(), JsonOptions::default());
        writer.set_crs(Some(Crs::epsg(4326)));
        writer.start_template_output(&hints).unwrap();
        writer
            .write_collection_bounds(&BoundingBox::new(1.0, 2.0, 3.0, 4.0))
            .unwrap();
        writer.end_template_output(&hints).unwrap();
        let out: serde_json::Value = serde_json::from_str(&output(writer)).unwrap();
        assert_eq!(out["bbox"], json!([2.0, 1.0, 4.0, 3.0]));
    }

    #[test]
    fn test_single_feature_request() {
        let options = JsonOptions {
            single_feature_request: true,
            ..JsonOptions::default()
        };
        let plain = EncodingHints::default();
        let skip = EncodingHints::default().skip_object_encoding();
        let mut writer = GeoJsonWriter::new(Vec::new(), options);
        writer.start_template_output(&plain).unwrap();
        writer.start_object(None, &skip).unwrap();
        writer
            .write_element_name_and_value(Some("type"), &Value::from("Feature"), &plain)
            .unwrap();
        writer.start_object(Some("properties"), &plain).unwrap();
        writer
            .write_element_name_and_value(Some("name"), &Value::from("x"), &plain)
            .unwrap();
        writer.end_object(Some("properties"), &plain).unwrap();
        writer.end_object(None, &skip).unwrap();
        writer.write_number_returned().unwrap();
        writer.end_template_output(&plain).unwrap();
        assert_eq!(
            output(writer),
            r#"{"type":"Feature","properties":{"name":"x"}}"#
        );
    }

    #[test]
    fn test_skip_hint_ignored_for_collections() {
        let plain = EncodingHints::default();
        let skip = EncodingHints::default().skip_object_encoding();
        let mut writer = GeoJsonWriter::new(Vec::new(), JsonOptions::default());
        writer.start_template_output(&plain).unwrap();
        writer.start_object(None, &skip).unwrap();
        writer.end_object(None, &skip).unwrap();
        writer.end_template_output(&plain).unwrap();
        assert_eq!(
            output(writer),
            r#"{"type":"FeatureCollection","features":[{}]}"#
        );
    }
}
