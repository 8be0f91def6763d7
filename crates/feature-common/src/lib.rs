//! Common types shared by the feature template output writers.
//!
//! The template evaluator hands the writers [`Value`]s and [`EncodingHints`];
//! the writers consult [`Crs`] and [`BoundingBox`] for collection metadata.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod hints;
pub mod link;
pub mod time;
pub mod value;

pub use bbox::BoundingBox;
pub use crs::{resolve, AxisOrder, Crs, CrsIdentifier, CrsParseError, SrsSyntax};
pub use error::{WriterError, WriterResult};
pub use hints::{AttributeSink, ChildrenEvaluation, EncodingHints, HintValue, XmlAttribute};
pub use link::Link;
pub use time::format_iso8601;
pub use value::{Attribute, ComplexAttribute, GeometryValue, Number, Value};
