//! GeoJSON input loading.

use std::path::Path;

use anyhow::{Context, Result};
use geojson::{feature::Id, GeoJson};
use tracing::{debug, warn};

use feature_common::{GeometryValue, Number, Value};

/// One feature read from the input document.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFeature {
    pub id: Option<String>,
    /// Properties in document order.
    pub properties: Vec<(String, Value)>,
    pub geometry: Option<GeometryValue>,
}

/// Parse a GeoJSON `FeatureCollection` or a single `Feature`.
///
/// Geometries are tagged with `srid`; pass zero when it is unknown.
pub fn read_features(text: &str, srid: i32) -> Result<Vec<InputFeature>> {
    let geojson: GeoJson = text.parse().context("Failed to parse GeoJSON input")?;
    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            anyhow::bail!("input must be a Feature or FeatureCollection, found a bare geometry")
        }
    };
    debug!(count = features.len(), "parsed input features");

    features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            convert_feature(feature, srid).with_context(|| format!("Invalid feature #{}", i + 1))
        })
        .collect()
}

/// Load features from a file, `-` meaning standard input.
pub fn load_features(path: &Path, srid: i32) -> Result<Vec<InputFeature>> {
    let text = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read standard input")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read: {:?}", path))?
    };
    read_features(&text, srid)
}

fn convert_feature(feature: geojson::Feature, srid: i32) -> Result<InputFeature> {
    let id = feature.id.map(|id| match id {
        Id::String(s) => s,
        Id::Number(n) => n.to_string(),
    });
    let properties = feature
        .properties
        .unwrap_or_default()
        .iter()
        .map(|(name, node)| (name.clone(), json_to_value(node)))
        .collect();
    let geometry = match feature.geometry {
        Some(geometry) => {
            let geometry = geo_types::Geometry::<f64>::try_from(geometry.value)
                .context("Unsupported geometry")?;
            Some(GeometryValue::new(geometry).with_srid(srid))
        }
        None => {
            warn!(id = ?id, "feature without geometry");
            None
        }
    };
    Ok(InputFeature {
        id,
        properties,
        geometry,
    })
}

/// Map a GeoJSON property onto a writer value.
///
/// JSON arrays stay native arrays; objects are passed through as nodes.
pub fn json_to_value(node: &serde_json::Value) -> Value {
    match node {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::Int(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::UInt(u))
            } else {
                Value::Number(Number::Double(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::array(items.iter().map(json_to_value)),
        serde_json::Value::Object(_) => Value::Node(node.clone()),
    }
}
