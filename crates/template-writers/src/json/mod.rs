pub mod common;
pub mod context;
pub mod generator;
pub mod geojson;
pub mod jsonld;

pub use common::{CommonJsonWriter, GeometryEncoding, JsonOptions};
pub use context::nodes_union;
pub use generator::JsonGenerator;
pub use geojson::GeoJsonWriter;
pub use jsonld::JsonLdWriter;
