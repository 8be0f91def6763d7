//! Common test fixtures for the template writer tests.
//!
//! This module provides pre-defined features, geometries and hints that
//! represent the usual shapes of a feature template response.

use chrono::{DateTime, FixedOffset, TimeZone};
use geo_types::{line_string, point, polygon, Geometry, MultiPolygon, Polygon};

use feature_common::{EncodingHints, GeometryValue, HintValue, Value, XmlAttribute};

/// Sample geometries.
pub mod geometries {
    use super::*;

    pub fn station_point() -> Geometry<f64> {
        point!(x: 11.25, y: 43.5).into()
    }

    pub fn square() -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0)
        ]
    }

    pub fn square_with_hole() -> Polygon<f64> {
        Polygon::new(
            square().exterior().clone(),
            vec![line_string![
                (x: 2.0, y: 2.0),
                (x: 4.0, y: 2.0),
                (x: 4.0, y: 4.0),
                (x: 2.0, y: 2.0)
            ]],
        )
    }

    pub fn river() -> Geometry<f64> {
        line_string![(x: 0.0, y: 0.0), (x: 5.0, y: 1.0), (x: 9.0, y: 4.0)].into()
    }

    pub fn two_islands() -> MultiPolygon<f64> {
        let far = polygon![
            (x: 20.0, y: 20.0),
            (x: 21.0, y: 20.0),
            (x: 21.0, y: 21.0),
            (x: 20.0, y: 20.0)
        ];
        MultiPolygon(vec![square(), far])
    }
}

/// A feature as the template evaluator would see it.
#[derive(Debug, Clone)]
pub struct SampleFeature {
    pub id: String,
    pub name: String,
    pub elevation: f64,
    pub tags: Vec<String>,
    pub observed: DateTime<FixedOffset>,
    pub geometry: GeometryValue,
}

impl SampleFeature {
    /// Property values in template order, geometry last.
    pub fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id.as_str())),
            ("name", Value::from(self.name.as_str())),
            ("elevation", Value::from(self.elevation)),
            (
                "tags",
                Value::List(self.tags.iter().map(|t| Value::from(t.as_str())).collect()),
            ),
            ("observed", Value::from(self.observed)),
            ("geometry", Value::from(self.geometry.clone())),
        ]
    }
}

/// Observation timestamp shared by the fixtures: 2024-03-01T12:30:00+01:00.
pub fn observed_at() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .and_then(|tz| tz.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).single())
        .expect("valid fixture timestamp")
}

/// Two stations of the same feature type.
pub fn stations() -> Vec<SampleFeature> {
    vec![
        SampleFeature {
            id: "st.1".to_string(),
            name: "Monte Amiata".to_string(),
            elevation: 1738.0,
            tags: vec!["summit".to_string()],
            observed: observed_at(),
            geometry: GeometryValue::new(point!(x: 11.62, y: 42.88)).with_srid(4326),
        },
        SampleFeature {
            id: "st.2".to_string(),
            name: "Firenze".to_string(),
            elevation: 50.5,
            tags: vec!["urban".to_string(), "river".to_string()],
            observed: observed_at(),
            geometry: GeometryValue::new(point!(x: 11.25, y: 43.77)).with_srid(4326),
        },
    ]
}

/// Root hints of an XHTML response with one stylesheet link.
pub fn html_head_hints() -> EncodingHints {
    EncodingHints::default()
        .with_style("body { font-family: sans-serif }")
        .with_extension(
            "linkStyle",
            HintValue::Attributes(vec![
                XmlAttribute::new("rel", "stylesheet"),
                XmlAttribute::new("href", "/styles/features.css"),
            ]),
        )
}

/// A small schema.org JSON-LD context.
pub fn schema_org_context() -> serde_json::Value {
    serde_json::json!({
        "@vocab": "http://schema.org/",
        "name": "schema:name"
    })
}
