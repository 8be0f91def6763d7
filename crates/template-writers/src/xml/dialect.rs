//! Per-version GML vocabulary.
//!
//! Everything that differs between GML 2, 3.1 and 3.2 lives in one static
//! table per version so the encoder itself has a single code path.

use serde::{Deserialize, Serialize};

use feature_common::SrsSyntax;

use crate::format::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GmlVersion {
    #[serde(rename = "2")]
    Gml2,
    #[serde(rename = "3.1")]
    Gml31,
    #[serde(rename = "3.2")]
    Gml32,
}

impl GmlVersion {
    /// GML version selected by an output format, `None` for non GML formats.
    pub fn from_format(format: OutputFormat) -> Option<Self> {
        match format {
            OutputFormat::Gml2 => Some(GmlVersion::Gml2),
            OutputFormat::Gml31 => Some(GmlVersion::Gml31),
            OutputFormat::Gml32 => Some(GmlVersion::Gml32),
            _ => None,
        }
    }

    pub fn dialect(&self) -> &'static GmlDialect {
        match self {
            GmlVersion::Gml2 => &GML2,
            GmlVersion::Gml31 => &GML31,
            GmlVersion::Gml32 => &GML32,
        }
    }
}

/// How collection counts appear on the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountAttributes {
    /// A single `numberOfFeatures`; the matched count is not written.
    NumberOfFeatures,
    /// `numberReturned` and `numberMatched`.
    ReturnedAndMatched,
}

#[derive(Debug)]
pub struct GmlDialect {
    pub version: GmlVersion,
    pub gml_namespace: &'static str,
    pub wfs_namespace: &'static str,
    pub srs_syntax: SrsSyntax,
    pub feature_member: &'static str,
    pub bounded_by: &'static str,
    /// Element holding a single coordinate tuple.
    pub position: &'static str,
    /// Element holding a coordinate sequence.
    pub position_list: &'static str,
    /// Separator between the ordinates of one tuple.
    pub ordinate_separator: char,
    pub exterior: &'static str,
    pub interior: &'static str,
    pub multi_curve: (&'static str, &'static str),
    pub multi_polygon: (&'static str, &'static str),
    /// Container used for multi polygons flagged as surfaces, when supported.
    pub multi_surface: Option<(&'static str, &'static str)>,
    pub counts: CountAttributes,
    pub time_stamp: bool,
    /// GML 3.2 geometries carry `gml:id` and `srsDimension`.
    pub geometry_ids: bool,
}

pub static GML2: GmlDialect = GmlDialect {
    version: GmlVersion::Gml2,
    gml_namespace: "http://www.opengis.net/gml",
    wfs_namespace: "http://www.opengis.net/wfs",
    srs_syntax: SrsSyntax::OgcHttpUrl,
    feature_member: "gml:featureMember",
    bounded_by: "gml:boundedBy",
    position: "gml:coordinates",
    position_list: "gml:coordinates",
    ordinate_separator: ',',
    exterior: "gml:outerBoundaryIs",
    interior: "gml:innerBoundaryIs",
    multi_curve: ("gml:MultiLineString", "gml:lineStringMember"),
    multi_polygon: ("gml:MultiPolygon", "gml:polygonMember"),
    multi_surface: None,
    counts: CountAttributes::NumberOfFeatures,
    time_stamp: false,
    geometry_ids: false,
};

pub static GML31: GmlDialect = GmlDialect {
    version: GmlVersion::Gml31,
    gml_namespace: "http://www.opengis.net/gml",
    wfs_namespace: "http://www.opengis.net/wfs",
    srs_syntax: SrsSyntax::OgcUrnExperimental,
    feature_member: "gml:featureMember",
    bounded_by: "gml:boundedBy",
    position: "gml:pos",
    position_list: "gml:posList",
    ordinate_separator: ' ',
    exterior: "gml:exterior",
    interior: "gml:interior",
    multi_curve: ("gml:MultiLineString", "gml:lineStringMember"),
    multi_polygon: ("gml:MultiPolygon", "gml:polygonMember"),
    multi_surface: Some(("gml:MultiSurface", "gml:surfaceMember")),
    counts: CountAttributes::NumberOfFeatures,
    time_stamp: true,
    geometry_ids: false,
};

pub static GML32: GmlDialect = GmlDialect {
    version: GmlVersion::Gml32,
    gml_namespace: "http://www.opengis.net/gml/3.2",
    wfs_namespace: "http://www.opengis.net/wfs/2.0",
    srs_syntax: SrsSyntax::OgcUrn,
    feature_member: "wfs:member",
    bounded_by: "wfs:boundedBy",
    position: "gml:pos",
    position_list: "gml:posList",
    ordinate_separator: ' ',
    exterior: "gml:exterior",
    interior: "gml:interior",
    multi_curve: ("gml:MultiCurve", "gml:curveMember"),
    multi_polygon: ("gml:MultiSurface", "gml:surfaceMember"),
    multi_surface: Some(("gml:MultiSurface", "gml:surfaceMember")),
    counts: CountAttributes::ReturnedAndMatched,
    time_stamp: true,
    geometry_ids: true,
};

impl GmlDialect {
    /// Container and member element names for a multi polygon.
    pub fn multi_polygon_elements(&self, multi_surface: bool) -> (&'static str, &'static str) {
        match (multi_surface, self.multi_surface) {
            (true, Some(elements)) => elements,
            _ => self.multi_polygon,
        }
    }
}
