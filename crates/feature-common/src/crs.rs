//! Coordinate Reference System identifiers and axis order resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{WriterError, WriterResult};

/// Axis order for coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrder {
    /// X (longitude/easting), Y (latitude/northing)
    #[default]
    EastNorth,
    /// Y (latitude/northing), X (longitude/easting)
    NorthEast,
}

impl AxisOrder {
    /// Order an (x, y) pair for output.
    ///
    /// Applying the same order twice gives back the original pair.
    pub fn order(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            AxisOrder::EastNorth => (x, y),
            AxisOrder::NorthEast => (y, x),
        }
    }
}

/// The srsName syntaxes understood by the writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrsSyntax {
    /// `EPSG:4326`
    AuthCode,
    /// `http://www.opengis.net/gml/srs/epsg.xml#4326`
    OgcHttpUrl,
    /// `urn:x-ogc:def:crs:EPSG:4326`
    OgcUrnExperimental,
    /// `urn:ogc:def:crs:EPSG::4326`
    OgcUrn,
}

impl SrsSyntax {
    /// Prefix that precedes the numeric EPSG code.
    pub fn prefix(&self) -> &'static str {
        match self {
            SrsSyntax::AuthCode => "EPSG:",
            SrsSyntax::OgcHttpUrl => "http://www.opengis.net/gml/srs/epsg.xml#",
            SrsSyntax::OgcUrnExperimental => "urn:x-ogc:def:crs:EPSG:",
            SrsSyntax::OgcUrn => "urn:ogc:def:crs:EPSG::",
        }
    }

    /// Build the srsName for an EPSG code.
    pub fn format(&self, code: u32) -> String {
        format!("{}{}", self.prefix(), code)
    }

    /// Whether coordinates under this syntax are always written x/y.
    ///
    /// Both `EPSG:` and the GML2 `epsg.xml#` URL are longitude first,
    /// whatever the authority says.
    pub fn forces_east_north(&self) -> bool {
        matches!(self, SrsSyntax::AuthCode | SrsSyntax::OgcHttpUrl)
    }

    /// Axis order implied by the syntax for a given code.
    fn axis_order_for(&self, code: u32) -> AxisOrder {
        if !self.forces_east_north() && is_latitude_first_epsg(code) {
            AxisOrder::NorthEast
        } else {
            AxisOrder::EastNorth
        }
    }
}

/// Codes in the geographic block that are projected or geocentric, and so
/// keep x/y order.
const NON_GEOGRAPHIC_IN_BLOCK: &[RangeInclusive<u32>] = &[
    4087..=4088,     // World Equidistant Cylindrical
    4390..=4415,     // Kertau, NAD27(CGQ77) projections
    4484..=4489,     // Mexico ITRF92 / UTM
    4491..=4554,     // CGCS2000 / Gauss-Kruger
    4568..=4589,     // New Beijing / Gauss-Kruger
    4652..=4656,     // New Beijing / 3-degree Gauss-Kruger
    4766..=4800,     // New Beijing / 3-degree Gauss-Kruger
    4855..=4880,     // ETRS89 / NTM
    4910..=4919,     // ITRF geocentric
    4936..=4936,     // ETRS89 geocentric
    4978..=4978,     // WGS 84 geocentric
];

/// EPSG geographic CRS live in the 4000-4999 block and are latitude first.
fn is_latitude_first_epsg(code: u32) -> bool {
    (4000..5000).contains(&code)
        && !NON_GEOGRAPHIC_IN_BLOCK
            .iter()
            .any(|range| range.contains(&code))
}

/// A coordinate reference system as seen by the writers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs {
    authority: String,
    code: String,
    axis_order: AxisOrder,
}

impl Crs {
    /// EPSG CRS using the authority axis order.
    pub fn epsg(code: u32) -> Self {
        Self {
            authority: "EPSG".to_string(),
            code: code.to_string(),
            axis_order: SrsSyntax::OgcUrn.axis_order_for(code),
        }
    }

    /// EPSG CRS with east/north axis order forced.
    pub fn epsg_east_north(code: u32) -> Self {
        Self {
            axis_order: AxisOrder::EastNorth,
            ..Self::epsg(code)
        }
    }

    /// OGC CRS84 (WGS84 with longitude first).
    pub fn crs84() -> Self {
        Self {
            authority: "OGC".to_string(),
            code: "CRS84".to_string(),
            axis_order: AxisOrder::EastNorth,
        }
    }

    /// A CRS outside the EPSG database.
    pub fn custom(
        authority: impl Into<String>,
        code: impl Into<String>,
        axis_order: AxisOrder,
    ) -> Self {
        Self {
            authority: authority.into(),
            code: code.into(),
            axis_order,
        }
    }

    /// Parse an srsName in any of the supported syntaxes.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326" (east/north)
    /// - "urn:ogc:def:crs:EPSG::4326" (authority order)
    /// - "urn:x-ogc:def:crs:EPSG:4326" (authority order)
    /// - "http://www.opengis.net/gml/srs/epsg.xml#4326" (authority order)
    /// - "CRS:84"
    pub fn parse(srs_name: &str) -> Result<Self, CrsParseError> {
        let trimmed = srs_name.trim();
        let upper = trimmed.to_uppercase();

        if upper == "CRS:84" || upper == "URN:OGC:DEF:CRS:OGC:1.3:CRS84" {
            return Ok(Crs::crs84());
        }

        for syntax in [
            SrsSyntax::OgcUrn,
            SrsSyntax::OgcUrnExperimental,
            SrsSyntax::OgcHttpUrl,
            SrsSyntax::AuthCode,
        ] {
            let prefix = syntax.prefix().to_uppercase();
            if let Some(rest) = upper.strip_prefix(&prefix) {
                let code: u32 = rest
                    .parse()
                    .map_err(|_| CrsParseError::InvalidCode(trimmed.to_string()))?;
                return Ok(Self {
                    authority: "EPSG".to_string(),
                    code: code.to_string(),
                    axis_order: syntax.axis_order_for(code),
                });
            }
        }

        Err(CrsParseError::UnsupportedSyntax(trimmed.to_string()))
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    /// The EPSG code, when this CRS is an EPSG one.
    pub fn epsg_code(&self) -> Option<u32> {
        if self.authority.eq_ignore_ascii_case("EPSG") {
            self.code.parse().ok()
        } else {
            None
        }
    }

    /// Canonical URI identifier: the OGC URN for EPSG codes, otherwise the
    /// generic `AUTHORITY:CODE` identifier.
    pub fn identifier(&self) -> WriterResult<String> {
        if let Some(code) = self.epsg_code() {
            return Ok(SrsSyntax::OgcUrn.format(code));
        }
        self.generic_identifier()
    }

    /// srsName in the requested syntax, falling back to the generic identifier
    /// for CRSs without an EPSG code.
    pub fn srs_name(&self, syntax: SrsSyntax) -> WriterResult<String> {
        match self.epsg_code() {
            Some(code) => Ok(syntax.format(code)),
            None => self.generic_identifier(),
        }
    }

    fn generic_identifier(&self) -> WriterResult<String> {
        if self.authority.is_empty() || self.code.is_empty() {
            return Err(WriterError::Crs(format!(
                "no identifier for CRS '{}:{}'",
                self.authority, self.code
            )));
        }
        Ok(format!("{}:{}", self.authority, self.code))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

/// Canonical identifier plus axis order of a CRS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrsIdentifier {
    pub uri: String,
    pub axis_order: AxisOrder,
}

/// Resolve the canonical URI identifier and axis order of a CRS.
pub fn resolve(crs: &Crs) -> WriterResult<CrsIdentifier> {
    Ok(CrsIdentifier {
        uri: crs.identifier()?,
        axis_order: crs.axis_order(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported srsName syntax: {0}")]
    UnsupportedSyntax(String),

    #[error("Invalid CRS code in: {0}")]
    InvalidCode(String),
}

impl From<CrsParseError> for WriterError {
    fn from(err: CrsParseError) -> Self {
        WriterError::Crs(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs() {
        let crs = Crs::parse("EPSG:4326").unwrap();
        assert_eq!(crs.epsg_code(), Some(4326));
        assert_eq!(crs.axis_order(), AxisOrder::EastNorth);

        let crs = Crs::parse("urn:ogc:def:crs:EPSG::4326").unwrap();
        assert_eq!(crs.axis_order(), AxisOrder::NorthEast);

        let crs = Crs::parse("urn:x-ogc:def:crs:EPSG:3857").unwrap();
        assert_eq!(crs.epsg_code(), Some(3857));
        assert_eq!(crs.axis_order(), AxisOrder::EastNorth);

        assert_eq!(Crs::parse("crs:84").unwrap(), Crs::crs84());
        assert!(Crs::parse("EPSG:abc").is_err());
        assert!(Crs::parse("ESRI:102100").is_err());
    }

    #[test]
    fn test_identifier() {
        assert_eq!(
            Crs::epsg(4326).identifier().unwrap(),
            "urn:ogc:def:crs:EPSG::4326"
        );
        assert_eq!(Crs::crs84().identifier().unwrap(), "OGC:CRS84");
        assert!(Crs::custom("", "", AxisOrder::EastNorth)
            .identifier()
            .is_err());
    }

    #[test]
    fn test_srs_name_syntaxes() {
        let crs = Crs::epsg(32632);
        assert_eq!(
            crs.srs_name(SrsSyntax::OgcHttpUrl).unwrap(),
            "http://www.opengis.net/gml/srs/epsg.xml#32632"
        );
        assert_eq!(
            crs.srs_name(SrsSyntax::OgcUrnExperimental).unwrap(),
            "urn:x-ogc:def:crs:EPSG:32632"
        );
        assert_eq!(
            Crs::crs84().srs_name(SrsSyntax::OgcUrn).unwrap(),
            "OGC:CRS84"
        );
    }

    #[test]
    fn test_axis_order() {
        assert_eq!(Crs::epsg(4326).axis_order(), AxisOrder::NorthEast);
        assert_eq!(Crs::epsg(3857).axis_order(), AxisOrder::EastNorth);
        assert_eq!(Crs::epsg_east_north(4326).axis_order(), AxisOrder::EastNorth);

        let (a, b) = AxisOrder::NorthEast.order(10.0, 20.0);
        assert_eq!((a, b), (20.0, 10.0));
        assert_eq!(AxisOrder::NorthEast.order(a, b), (10.0, 20.0));
        assert_eq!(AxisOrder::EastNorth.order(10.0, 20.0), (10.0, 20.0));
    }

    #[test]
    fn test_resolve() {
        let resolved = resolve(&Crs::epsg(4326)).unwrap();
        assert_eq!(resolved.uri, "urn:ogc:def:crs:EPSG::4326");
        assert_eq!(resolved.axis_order, AxisOrder::NorthEast);
    }
}
