//! Feature template output writers.
//!
//! This crate streams features, as evaluated by a template, into the output
//! encodings of an OGC feature service:
//!
//! - **GeoJSON**: `FeatureCollection` with counts, bbox, crs and links
//! - **JSON-LD**: GeoJSON structure plus `@context`, optional WKT geometries
//! - **GML 2 / 3.1 / 3.2**: `wfs:FeatureCollection` with version correct
//!   geometry encoding and axis order
//! - **XHTML**: a minimal HTML document
//!
//! Every encoding implements [`TemplateOutputWriter`]. A writer is bound to
//! one response sink and driven by a single caller.
//!
//! # Example
//!
//! ```rust
//! use feature_common::{EncodingHints, Value};
//! use template_writers::{create_writer, OutputFormat, TemplateOutputWriter, WriterConfig};
//!
//! let mut out = Vec::new();
//! {
//!     let mut writer = create_writer(OutputFormat::GeoJson, &mut out, &WriterConfig::default());
//!     let hints = EncodingHints::default();
//!     writer.start_template_output(&hints).unwrap();
//!     writer.start_object(None, &hints).unwrap();
//!     writer.write_element_name_and_value(Some("name"), &Value::from("Station 1"), &hints).unwrap();
//!     writer.end_object(None, &hints).unwrap();
//!     writer.increment_number_returned();
//!     writer.write_number_returned().unwrap();
//!     writer.end_template_output(&hints).unwrap();
//!     writer.close().unwrap();
//! }
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     r#"{"type":"FeatureCollection","features":[{"name":"Station 1"}],"numberReturned":1}"#
//! );
//! ```

pub mod config;
pub mod factory;
pub mod format;
pub mod geometry;
pub mod json;
pub mod writer;
pub mod xml;

// Re-export commonly used types
pub use config::{GmlConfig, WriterConfig};
pub use factory::create_writer;
pub use format::{negotiate_format, OutputFormat};
pub use json::{nodes_union, GeoJsonWriter, JsonLdWriter, JsonOptions};
pub use writer::{OutputState, StaticContent, TemplateOutputWriter};
pub use xml::gml::GmlOptions;
pub use xml::{GmlVersion, GmlWriter, XhtmlWriter};
