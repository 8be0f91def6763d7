//! Bounding box types and operations.

use geo_types::{Coord, Geometry};
use serde::{Deserialize, Serialize};

use crate::crs::AxisOrder;

/// Envelope of a feature collection in the coordinates of its CRS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Envelope of all coordinates of a geometry, `None` for empty geometries.
    pub fn of_geometry(geometry: &Geometry<f64>) -> Option<Self> {
        let mut bbox: Option<BoundingBox> = None;
        visit_coords(geometry, &mut |c| {
            bbox.get_or_insert(BoundingBox::new(c.x, c.y, c.x, c.y))
                .expand_to_coord(c.x, c.y);
        });
        bbox
    }

    /// Grow this box so it also covers `other`.
    pub fn expand_to_include(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    fn expand_to_coord(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Lower corner ordered for output.
    pub fn lower_corner(&self, axis_order: AxisOrder) -> (f64, f64) {
        axis_order.order(self.min_x, self.min_y)
    }

    /// Upper corner ordered for output.
    pub fn upper_corner(&self, axis_order: AxisOrder) -> (f64, f64) {
        axis_order.order(self.max_x, self.max_y)
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

fn visit_coords(geometry: &Geometry<f64>, f: &mut dyn FnMut(&Coord<f64>)) {
    match geometry {
        Geometry::Point(p) => f(&p.0),
        Geometry::Line(l) => {
            f(&l.start);
            f(&l.end);
        }
        Geometry::LineString(ls) => ls.0.iter().for_each(|c| f(c)),
        Geometry::Polygon(p) => p.exterior().0.iter().for_each(|c| f(c)),
        Geometry::MultiPoint(mp) => mp.0.iter().for_each(|p| f(&p.0)),
        Geometry::MultiLineString(mls) => mls
            .0
            .iter()
            .flat_map(|ls| ls.0.iter())
            .for_each(|c| f(c)),
        Geometry::MultiPolygon(mp) => mp
            .0
            .iter()
            .flat_map(|p| p.exterior().0.iter())
            .for_each(|c| f(c)),
        Geometry::GeometryCollection(gc) => gc.0.iter().for_each(|g| visit_coords(g, f)),
        Geometry::Rect(r) => {
            f(&r.min());
            f(&r.max());
        }
        Geometry::Triangle(t) => {
            f(&t.0);
            f(&t.1);
            f(&t.2);
        }
    }
}
