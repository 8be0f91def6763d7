//! GML 2 / 3.1 / 3.2 writer.
//!
//! The writer handles the template structure; [`GmlDialectManager`] owns the
//! version specific state (type name, feature ordinal, namespaces) and the
//! geometry encoding.

use std::collections::BTreeMap;
use std::io::Write;

use geo_types::{Coord, Geometry, LineString, Polygon};
use tracing::{debug, warn};

use feature_common::{
    time::timestamp_now, AxisOrder, BoundingBox, Crs, EncodingHints, GeometryValue, Value,
    WriterResult,
};

use crate::geometry::with_axis_order;
use crate::writer::{OutputState, StaticContent, TemplateOutputWriter};
use crate::xml::dialect::{CountAttributes, GmlDialect, GmlVersion};
use crate::xml::emitter::XmlEmitter;
use crate::xml::{open_element, write_static, write_value, GeometryEncoder};

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const ROOT_ELEMENT: &str = "wfs:FeatureCollection";

/// Extra declarations for the root element.
#[derive(Debug, Clone, Default)]
pub struct GmlOptions {
    /// prefix -> namespace URI
    pub namespaces: BTreeMap<String, String>,
    /// namespace URI -> schema URL
    pub schema_locations: BTreeMap<String, String>,
}

/// Version specific GML state.
#[derive(Debug)]
pub struct GmlDialectManager {
    dialect: &'static GmlDialect,
    type_name: Option<String>,
    current_feature_number: u64,
    geometry_index: usize,
    awaiting_type: bool,
    namespaces: BTreeMap<String, String>,
    schema_locations: BTreeMap<String, String>,
    axis_order: AxisOrder,
    srs_name: Option<String>,
}

impl GmlDialectManager {
    pub fn new(version: GmlVersion) -> Self {
        let dialect = version.dialect();
        let mut namespaces = BTreeMap::new();
        namespaces.insert("gml".to_string(), dialect.gml_namespace.to_string());
        namespaces.insert("wfs".to_string(), dialect.wfs_namespace.to_string());
        Self {
            dialect,
            type_name: None,
            current_feature_number: 1,
            geometry_index: 0,
            awaiting_type: false,
            namespaces,
            schema_locations: BTreeMap::new(),
            axis_order: AxisOrder::default(),
            srs_name: None,
        }
    }

    pub fn dialect(&self) -> &'static GmlDialect {
        self.dialect
    }

    pub fn add_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.namespaces.insert(prefix.into(), uri.into());
    }

    pub fn add_schema_location(&mut self, namespace: impl Into<String>, url: impl Into<String>) {
        self.schema_locations.insert(namespace.into(), url.into());
    }

    pub fn namespaces(&self) -> &BTreeMap<String, String> {
        &self.namespaces
    }

    /// Set the qualified name of the feature type being written. Restarts the
    /// feature ordinal.
    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = Some(type_name.into());
        self.current_feature_number = 1;
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn current_feature_number(&self) -> u64 {
        self.current_feature_number
    }

    /// Take axis order and srsName for the following geometries from the CRS.
    /// GML2 srsNames are always longitude first, whatever the CRS says.
    pub fn use_crs(&mut self, crs: Option<&Crs>, axis_order: AxisOrder) -> WriterResult<()> {
        self.axis_order = if self.dialect.srs_syntax.forces_east_north() {
            AxisOrder::EastNorth
        } else {
            axis_order
        };
        self.srs_name = match crs {
            Some(crs) => Some(crs.srs_name(self.dialect.srs_syntax)?),
            None => None,
        };
        Ok(())
    }

    pub fn write_root<W: Write>(&self, emitter: &mut XmlEmitter<W>) -> WriterResult<()> {
        emitter.write_declaration()?;
        emitter.start_element(ROOT_ELEMENT)?;
        for (prefix, uri) in &self.namespaces {
            emitter.write_attribute(&format!("xmlns:{}", prefix), uri)?;
        }
        if !self.schema_locations.is_empty() {
            if !self.namespaces.contains_key("xsi") {
                emitter.write_attribute("xmlns:xsi", XSI_NAMESPACE)?;
            }
            let locations = self
                .schema_locations
                .iter()
                .map(|(ns, url)| format!("{} {}", ns, url))
                .collect::<Vec<_>>()
                .join(" ");
            emitter.write_attribute("xsi:schemaLocation", &locations)?;
        }
        Ok(())
    }

    pub fn start_feature_member<W: Write>(&mut self, emitter: &mut XmlEmitter<W>) -> WriterResult<()> {
        emitter.start_element(self.dialect.feature_member)?;
        self.geometry_index = 0;
        self.awaiting_type = true;
        Ok(())
    }

    pub fn end_feature_member<W: Write>(&mut self, emitter: &mut XmlEmitter<W>) -> WriterResult<()> {
        emitter.end_element()?;
        self.awaiting_type = false;
        self.current_feature_number += 1;
        Ok(())
    }

    /// The first element inside a feature member names the feature type.
    fn observe_element(&mut self, name: &str) {
        if !self.awaiting_type {
            return;
        }
        self.awaiting_type = false;
        if self.type_name.as_deref() != Some(name) {
            debug!(type_name = name, "feature type changed");
            self.set_type_name(name);
        }
    }

    /// Root count attributes; only valid before the first child of the root.
    pub fn write_number_returned<W: Write>(
        &self,
        emitter: &mut XmlEmitter<W>,
        count: u64,
    ) -> WriterResult<()> {
        let name = match self.dialect.counts {
            CountAttributes::NumberOfFeatures => "numberOfFeatures",
            CountAttributes::ReturnedAndMatched => "numberReturned",
        };
        emitter.write_attribute(name, &count.to_string())
    }

    pub fn write_number_matched<W: Write>(
        &self,
        emitter: &mut XmlEmitter<W>,
        count: Option<u64>,
    ) -> WriterResult<()> {
        match self.dialect.counts {
            CountAttributes::NumberOfFeatures => {
                debug!("numberMatched not available before GML 3.2");
                Ok(())
            }
            CountAttributes::ReturnedAndMatched => {
                let count = count.map_or_else(|| "unknown".to_string(), |c| c.to_string());
                emitter.write_attribute("numberMatched", &count)
            }
        }
    }

    pub fn write_bounding_box<W: Write>(
        &self,
        emitter: &mut XmlEmitter<W>,
        bounds: &BoundingBox,
    ) -> WriterResult<()> {
        let (lx, ly) = bounds.lower_corner(self.axis_order);
        let (ux, uy) = bounds.upper_corner(self.axis_order);
        emitter.start_element(self.dialect.bounded_by)?;
        emitter.start_element("gml:Envelope")?;
        if let Some(srs_name) = &self.srs_name {
            emitter.write_attribute("srsName", srs_name)?;
        }
        emitter.write_text_element("gml:lowerCorner", &format!("{} {}", lx, ly))?;
        emitter.write_text_element("gml:upperCorner", &format!("{} {}", ux, uy))?;
        emitter.end_element()?;
        emitter.end_element()
    }

    fn geometry_id(&self, index: usize) -> Option<String> {
        let type_name = self.type_name.as_deref()?;
        let local = type_name.rsplit(':').next().unwrap_or(type_name);
        let mut id = format!("{}.{}.geom", local, self.current_feature_number);
        if index > 0 {
            id.push_str(&format!(".{}", index));
        }
        Some(id)
    }

    /// Open a geometry element. Only the outermost geometry carries attributes.
    fn open_geometry<W: Write>(
        &self,
        emitter: &mut XmlEmitter<W>,
        element: &str,
        top: Option<usize>,
    ) -> WriterResult<()> {
        emitter.start_element(element)?;
        let Some(index) = top else {
            return Ok(());
        };
        if self.dialect.geometry_ids {
            if let Some(id) = self.geometry_id(index) {
                emitter.write_attribute("gml:id", &id)?;
            }
        }
        if let Some(srs_name) = &self.srs_name {
            emitter.write_attribute("srsName", srs_name)?;
        }
        if self.dialect.geometry_ids {
            emitter.write_attribute("srsDimension", "2")?;
        }
        Ok(())
    }

    fn format_coord(&self, c: &Coord<f64>) -> String {
        format!("{}{}{}", c.x, self.dialect.ordinate_separator, c.y)
    }

    fn write_position<W: Write>(&self, emitter: &mut XmlEmitter<W>, c: &Coord<f64>) -> WriterResult<()> {
        emitter.write_text_element(self.dialect.position, &self.format_coord(c))
    }

    fn write_position_list<W: Write>(
        &self,
        emitter: &mut XmlEmitter<W>,
        coords: &[Coord<f64>],
    ) -> WriterResult<()> {
        let text = coords
            .iter()
            .map(|c| self.format_coord(c))
            .collect::<Vec<_>>()
            .join(" ");
        emitter.write_text_element(self.dialect.position_list, &text)
    }

    fn write_line_string<W: Write>(
        &self,
        emitter: &mut XmlEmitter<W>,
        coords: &[Coord<f64>],
        top: Option<usize>,
    ) -> WriterResult<()> {
        self.open_geometry(emitter, "gml:LineString", top)?;
        self.write_position_list(emitter, coords)?;
        emitter.end_element()
    }

    fn write_ring<W: Write>(
        &self,
        emitter: &mut XmlEmitter<W>,
        wrapper: &str,
        ring: &LineString<f64>,
    ) -> WriterResult<()> {
        emitter.start_element(wrapper)?;
        emitter.start_element("gml:LinearRing")?;
        self.write_position_list(emitter, &ring.0)?;
        emitter.end_element()?;
        emitter.end_element()
    }

    fn write_polygon<W: Write>(
        &self,
        emitter: &mut XmlEmitter<W>,
        polygon: &Polygon<f64>,
        top: Option<usize>,
    ) -> WriterResult<()> {
        self.open_geometry(emitter, "gml:Polygon", top)?;
        self.write_ring(emitter, self.dialect.exterior, polygon.exterior())?;
        for interior in polygon.interiors() {
            self.write_ring(emitter, self.dialect.interior, interior)?;
        }
        emitter.end_element()
    }

    fn write_geometry<W: Write>(
        &self,
        emitter: &mut XmlEmitter<W>,
        geometry: &Geometry<f64>,
        multi_surface: bool,
        top: Option<usize>,
    ) -> WriterResult<()> {
        match geometry {
            Geometry::Point(point) => {
                self.open_geometry(emitter, "gml:Point", top)?;
                self.write_position(emitter, &point.0)?;
                emitter.end_element()
            }
            Geometry::Line(line) => self.write_line_string(emitter, &[line.start, line.end], top),
            Geometry::LineString(ls) => self.write_line_string(emitter, &ls.0, top),
            Geometry::Polygon(polygon) => self.write_polygon(emitter, polygon, top),
            Geometry::Rect(rect) => self.write_polygon(emitter, &rect.to_polygon(), top),
            Geometry::Triangle(triangle) => self.write_polygon(emitter, &triangle.to_polygon(), top),
            Geometry::MultiPoint(mp) => {
                self.open_geometry(emitter, "gml:MultiPoint", top)?;
                for point in &mp.0 {
                    emitter.start_element("gml:pointMember")?;
                    self.open_geometry(emitter, "gml:Point", None)?;
                    self.write_position(emitter, &point.0)?;
                    emitter.end_element()?;
                    emitter.end_element()?;
                }
                emitter.end_element()
            }
            Geometry::MultiLineString(mls) => {
                let (container, member) = self.dialect.multi_curve;
                self.open_geometry(emitter, container, top)?;
                for ls in &mls.0 {
                    emitter.start_element(member)?;
                    self.write_line_string(emitter, &ls.0, None)?;
                    emitter.end_element()?;
                }
                emitter.end_element()
            }
            Geometry::MultiPolygon(mp) => {
                let (container, member) = self.dialect.multi_polygon_elements(multi_surface);
                self.open_geometry(emitter, container, top)?;
                for polygon in &mp.0 {
                    emitter.start_element(member)?;
                    self.write_polygon(emitter, polygon, None)?;
                    emitter.end_element()?;
                }
                emitter.end_element()
            }
            Geometry::GeometryCollection(gc) => {
                self.open_geometry(emitter, "gml:MultiGeometry", top)?;
                for child in &gc.0 {
                    emitter.start_element("gml:geometryMember")?;
                    self.write_geometry(emitter, child, multi_surface, None)?;
                    emitter.end_element()?;
                }
                emitter.end_element()
            }
        }
    }
}

impl<W: Write> GeometryEncoder<W> for GmlDialectManager {
    fn encode_geometry(
        &mut self,
        emitter: &mut XmlEmitter<W>,
        geometry: &GeometryValue,
    ) -> WriterResult<()> {
        let ordered = with_axis_order(&geometry.geometry, self.axis_order);
        let index = self.geometry_index;
        self.geometry_index += 1;
        self.write_geometry(emitter, &ordered, geometry.multi_surface, Some(index))
    }
}

/// Writes a `wfs:FeatureCollection` in one GML version.
pub struct GmlWriter<W: Write> {
    emitter: XmlEmitter<W>,
    state: OutputState,
    manager: GmlDialectManager,
    pending_name: Option<String>,
    closed: bool,
}

impl<W: Write> GmlWriter<W> {
    pub fn new(out: W, version: GmlVersion, options: GmlOptions) -> Self {
        let mut manager = GmlDialectManager::new(version);
        for (prefix, uri) in options.namespaces {
            manager.add_namespace(prefix, uri);
        }
        for (namespace, url) in options.schema_locations {
            manager.add_schema_location(namespace, url);
        }
        Self {
            emitter: XmlEmitter::new(out),
            state: OutputState::default(),
            manager,
            pending_name: None,
            closed: false,
        }
    }

    pub fn manager(&self) -> &GmlDialectManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut GmlDialectManager {
        &mut self.manager
    }

    pub fn into_inner(self) -> W {
        self.emitter.into_inner()
    }

    fn sync_crs(&mut self) -> WriterResult<()> {
        self.manager
            .use_crs(self.state.crs(), self.state.axis_order())
    }

    fn encode(&mut self, name: Option<&str>, value: &Value, hints: &EncodingHints) -> WriterResult<()> {
        self.sync_crs()?;
        write_value(&mut self.emitter, &mut self.manager, name, value, hints)
    }
}

impl<W: Write> TemplateOutputWriter for GmlWriter<W> {
    fn state(&self) -> &OutputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.state
    }

    fn start_template_output(&mut self, _hints: &EncodingHints) -> WriterResult<()> {
        self.manager.write_root(&mut self.emitter)
    }

    fn end_template_output(&mut self, _hints: &EncodingHints) -> WriterResult<()> {
        self.emitter.end_element()?;
        self.emitter.flush()
    }

    fn start_object(&mut self, name: Option<&str>, hints: &EncodingHints) -> WriterResult<()> {
        match name {
            None => self.manager.start_feature_member(&mut self.emitter),
            Some(name) => {
                self.manager.observe_element(name);
                open_element(&mut self.emitter, name, hints)
            }
        }
    }

    fn end_object(&mut self, name: Option<&str>, _hints: &EncodingHints) -> WriterResult<()> {
        match name {
            None => self.manager.end_feature_member(&mut self.emitter),
            Some(_) => self.emitter.end_element(),
        }
    }

    fn start_array(&mut self, _name: Option<&str>, _hints: &EncodingHints) -> WriterResult<()> {
        Ok(())
    }

    fn end_array(&mut self, _name: Option<&str>, _hints: &EncodingHints) -> WriterResult<()> {
        Ok(())
    }

    fn write_element_name(
        &mut self,
        name: Option<&str>,
        _hints: &EncodingHints,
    ) -> WriterResult<()> {
        self.pending_name = name.map(str::to_string);
        Ok(())
    }

    fn write_element_value(&mut self, value: &Value, hints: &EncodingHints) -> WriterResult<()> {
        let name = self.pending_name.take();
        self.encode(name.as_deref(), value, hints)
    }

    fn write_element_name_and_value(
        &mut self,
        name: Option<&str>,
        value: &Value,
        hints: &EncodingHints,
    ) -> WriterResult<()> {
        self.encode(name, value, hints)
    }

    fn write_static_content(
        &mut self,
        name: Option<&str>,
        content: &StaticContent,
        _hints: &EncodingHints,
    ) -> WriterResult<()> {
        write_static(&mut self.emitter, name, content)
    }

    fn write_collection_counts(&mut self, feature_count: Option<u64>) -> WriterResult<()> {
        self.manager.write_number_matched(&mut self.emitter, feature_count)
    }

    fn write_crs(&mut self) -> WriterResult<()> {
        debug!("GML carries the CRS on srsName attributes");
        Ok(())
    }

    fn write_time_stamp(&mut self) -> WriterResult<()> {
        if self.manager.dialect().time_stamp {
            self.emitter.write_attribute("timeStamp", &timestamp_now())
        } else {
            debug!("timeStamp not available in GML 2");
            Ok(())
        }
    }

    fn write_collection_bounds(&mut self, bounds: &BoundingBox) -> WriterResult<()> {
        self.sync_crs()?;
        if self.state.crs().is_none() {
            warn!("bounds written without a CRS");
        }
        self.manager.write_bounding_box(&mut self.emitter, bounds)
    }

    fn write_number_returned(&mut self) -> WriterResult<()> {
        let count = self.state.number_returned();
        self.manager.write_number_returned(&mut self.emitter, count)
    }

    fn close(&mut self) -> WriterResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.emitter.flush()
    }
}
