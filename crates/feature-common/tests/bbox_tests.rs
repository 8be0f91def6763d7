//! Tests for BoundingBox accumulation and axis ordered corners.

use feature_common::{AxisOrder, BoundingBox};
use geo_types::{line_string, point, Geometry, GeometryCollection, MultiPoint, Rect};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox.min_x, -180.0);
    assert_eq!(bbox.min_y, -90.0);
    assert_eq!(bbox.max_x, 180.0);
    assert_eq!(bbox.max_y, 90.0);
    assert_eq!(bbox.width(), 360.0);
    assert_eq!(bbox.height(), 180.0);
}

// ============================================================================
// of_geometry tests
// ============================================================================

#[test]
fn test_of_point_is_degenerate() {
    let geom: Geometry<f64> = point!(x: 3.0, y: 4.0).into();
    let bbox = BoundingBox::of_geometry(&geom).unwrap();
    assert_eq!(bbox, BoundingBox::new(3.0, 4.0, 3.0, 4.0));
    assert_eq!(bbox.width(), 0.0);
}

#[test]
fn test_of_line_string() {
    let geom: Geometry<f64> =
        line_string![(x: 1.0, y: 5.0), (x: -2.0, y: 3.0), (x: 4.0, y: -1.0)].into();
    let bbox = BoundingBox::of_geometry(&geom).unwrap();
    assert_eq!(bbox, BoundingBox::new(-2.0, -1.0, 4.0, 5.0));
}

#[test]
fn test_of_rect() {
    let geom: Geometry<f64> = Rect::new((0.0, 0.0), (2.0, 3.0)).into();
    let bbox = BoundingBox::of_geometry(&geom).unwrap();
    assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 2.0, 3.0));
}

#[test]
fn test_of_nested_collection() {
    let geom: Geometry<f64> = Geometry::GeometryCollection(GeometryCollection(vec![
        point!(x: 10.0, y: 10.0).into(),
        MultiPoint(vec![point!(x: -1.0, y: 2.0), point!(x: 0.0, y: 20.0)]).into(),
    ]));
    let bbox = BoundingBox::of_geometry(&geom).unwrap();
    assert_eq!(bbox, BoundingBox::new(-1.0, 2.0, 10.0, 20.0));
}

#[test]
fn test_of_empty_geometry() {
    let geom: Geometry<f64> = Geometry::GeometryCollection(GeometryCollection(vec![]));
    assert!(BoundingBox::of_geometry(&geom).is_none());

    let geom: Geometry<f64> = MultiPoint::<f64>(vec![]).into();
    assert!(BoundingBox::of_geometry(&geom).is_none());
}

// ============================================================================
// expand_to_include tests
// ============================================================================

#[test]
fn test_expand_to_include() {
    let mut bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    bbox.expand_to_include(&BoundingBox::new(-5.0, 0.5, 0.5, 8.0));
    assert_eq!(bbox, BoundingBox::new(-5.0, 0.0, 1.0, 8.0));
}

#[test]
fn test_expand_with_contained_box_is_noop() {
    let mut bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    bbox.expand_to_include(&BoundingBox::new(2.0, 2.0, 3.0, 3.0));
    assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
}

// ============================================================================
// Corner tests
// ============================================================================

#[test]
fn test_corners_east_north() {
    let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(bbox.lower_corner(AxisOrder::EastNorth), (1.0, 2.0));
    assert_eq!(bbox.upper_corner(AxisOrder::EastNorth), (3.0, 4.0));
}

#[test]
fn test_corners_north_east() {
    let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(bbox.lower_corner(AxisOrder::NorthEast), (2.0, 1.0));
    // upper corner uses max y, not max x twice
    assert_eq!(bbox.upper_corner(AxisOrder::NorthEast), (4.0, 3.0));
}

#[test]
fn test_bbox_serde() {
    let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
    let json = serde_json::to_string(&bbox).unwrap();
    assert_eq!(json, r#"{"min_x":1.0,"min_y":2.0,"max_x":3.0,"max_y":4.0}"#);
    let back: BoundingBox = serde_json::from_str(&json).unwrap();
    assert_eq!(back, bbox);
}
