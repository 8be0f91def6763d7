//! Generators for synthetic features.
//!
//! These generators create predictable, verifiable feature data for
//! benchmarks and larger tests.

use geo_types::{Coord, LineString, Polygon};

use feature_common::{GeometryValue, Value};

/// Creates `count` point features laid out on a grid.
///
/// Feature `i` sits at `(i % 100, i / 100)` and is named `feature-<i>`.
///
/// # Example
///
/// ```
/// use test_utils::create_point_features;
///
/// let features = create_point_features(3);
/// assert_eq!(features.len(), 3);
/// assert_eq!(features[2][0].0, "name");
/// ```
pub fn create_point_features(count: usize) -> Vec<Vec<(&'static str, Value)>> {
    (0..count)
        .map(|i| {
            let x = (i % 100) as f64;
            let y = (i / 100) as f64;
            vec![
                ("name", Value::from(format!("feature-{}", i))),
                ("value", Value::from(i as i64)),
                ("ratio", Value::from(i as f64 / 10.0)),
                (
                    "geometry",
                    Value::from(GeometryValue::new(geo_types::Point::new(x, y))),
                ),
            ]
        })
        .collect()
}

/// Creates a closed regular polygon with `vertices` corners around a center.
///
/// The ring has `vertices + 1` coordinates, the last repeating the first.
///
/// # Example
///
/// ```
/// use test_utils::create_ring_polygon;
///
/// let polygon = create_ring_polygon((0.0, 0.0), 1.0, 8);
/// assert_eq!(polygon.exterior().0.len(), 9);
/// ```
pub fn create_ring_polygon(center: (f64, f64), radius: f64, vertices: usize) -> Polygon<f64> {
    let vertices = vertices.max(3);
    let mut coords: Vec<Coord<f64>> = (0..vertices)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / vertices as f64;
            Coord {
                x: center.0 + radius * angle.cos(),
                y: center.1 + radius * angle.sin(),
            }
        })
        .collect();
    coords.push(coords[0]);
    Polygon::new(LineString(coords), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_point_features_layout() {
        let features = create_point_features(150);
        assert_eq!(features.len(), 150);
        match &features[101][3].1 {
            Value::Geometry(g) => match &g.geometry {
                geo_types::Geometry::Point(p) => assert_eq!((p.x(), p.y()), (1.0, 1.0)),
                other => panic!("Expected point, got {:?}", other),
            },
            other => panic!("Expected geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_ring_is_closed() {
        let polygon = create_ring_polygon((5.0, 5.0), 2.0, 16);
        let ring = &polygon.exterior().0;
        assert_eq!(ring.first(), ring.last());
        assert!((ring[0].x - 7.0).abs() < 1e-9);
        assert!((ring[0].y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_ring_minimum_vertices() {
        let polygon = create_ring_polygon((0.0, 0.0), 1.0, 1);
        assert_eq!(polygon.exterior().0.len(), 4);
    }
}
