//! Geometry helpers shared by the encoders.

use std::borrow::Cow;

use geo_types::{
    Coord, Geometry, GeometryCollection, Line, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Rect, Triangle,
};
use wkt::ToWkt;

use feature_common::{AxisOrder, GeometryValue};

/// The geometry with its ordinates in output order.
pub fn with_axis_order(geometry: &Geometry<f64>, axis_order: AxisOrder) -> Cow<'_, Geometry<f64>> {
    match axis_order {
        AxisOrder::EastNorth => Cow::Borrowed(geometry),
        AxisOrder::NorthEast => Cow::Owned(swap_geometry(geometry)),
    }
}

fn swap(c: &Coord<f64>) -> Coord<f64> {
    Coord { x: c.y, y: c.x }
}

fn swap_line_string(ls: &LineString<f64>) -> LineString<f64> {
    LineString(ls.0.iter().map(swap).collect())
}

fn swap_polygon(p: &Polygon<f64>) -> Polygon<f64> {
    Polygon::new(
        swap_line_string(p.exterior()),
        p.interiors().iter().map(swap_line_string).collect(),
    )
}

fn swap_geometry(geometry: &Geometry<f64>) -> Geometry<f64> {
    match geometry {
        Geometry::Point(p) => Point(swap(&p.0)).into(),
        Geometry::Line(l) => Line::new(swap(&l.start), swap(&l.end)).into(),
        Geometry::LineString(ls) => swap_line_string(ls).into(),
        Geometry::Polygon(p) => swap_polygon(p).into(),
        Geometry::MultiPoint(mp) => MultiPoint(mp.0.iter().map(|p| Point(swap(&p.0))).collect()).into(),
        Geometry::MultiLineString(mls) => {
            MultiLineString(mls.0.iter().map(swap_line_string).collect()).into()
        }
        Geometry::MultiPolygon(mp) => MultiPolygon(mp.0.iter().map(swap_polygon).collect()).into(),
        Geometry::GeometryCollection(gc) => {
            Geometry::GeometryCollection(GeometryCollection(gc.0.iter().map(swap_geometry).collect()))
        }
        Geometry::Rect(r) => Rect::new(swap(&r.min()), swap(&r.max())).into(),
        Geometry::Triangle(t) => Triangle(swap(&t.0), swap(&t.1), swap(&t.2)).into(),
    }
}

/// WKT text, prefixed with `SRID=<n>;` when the geometry has a positive SRID.
pub fn to_ewkt(value: &GeometryValue) -> String {
    let wkt = value.geometry.wkt_string();
    if value.srid > 0 {
        format!("SRID={};{}", value.srid, wkt)
    } else {
        wkt
    }
}

/// Plain WKT text.
pub fn to_wkt(value: &GeometryValue) -> String {
    value.geometry.wkt_string()
}
