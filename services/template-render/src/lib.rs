//! Template render tool library.
//!
//! Reads GeoJSON features and streams them through a feature template
//! output writer, using a flat template: one object per feature, one
//! element per property, geometry last.

pub mod input;
pub mod render;
