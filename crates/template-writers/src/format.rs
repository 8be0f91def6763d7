//! Output formats and their media types.
//!
//! Formats can be requested explicitly through an `f`-style parameter or
//! negotiated from an Accept header with quality values.

use serde::{Deserialize, Serialize};

use feature_common::{WriterError, WriterResult};

/// Media types accepted by [`negotiate_format`], in preference order.
pub const SUPPORTED_MEDIA_TYPES: &[&str] = &[
    "application/geo+json",
    "application/ld+json",
    "application/gml+xml; version=3.2",
    "application/gml+xml; version=3.1",
    "application/gml+xml; version=2.1",
    "text/html",
];

/// Output encodings of the template writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    GeoJson,
    JsonLd,
    Gml2,
    Gml31,
    Gml32,
    Xhtml,
}

impl OutputFormat {
    /// Content-Type header value for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::GeoJson => "application/geo+json",
            OutputFormat::JsonLd => "application/ld+json",
            OutputFormat::Gml2 => "application/gml+xml; version=2.1",
            OutputFormat::Gml31 => "application/gml+xml; version=3.1",
            OutputFormat::Gml32 => "application/gml+xml; version=3.2",
            OutputFormat::Xhtml => "text/html",
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::GeoJson | OutputFormat::JsonLd)
    }

    /// Parse the short format names and aliases used in query parameters.
    pub fn from_query_param(f: &str) -> Option<Self> {
        match f.trim().to_lowercase().as_str() {
            "geojson" | "json" | "geo+json" => Some(OutputFormat::GeoJson),
            "jsonld" | "json-ld" | "ld+json" => Some(OutputFormat::JsonLd),
            "gml2" | "gml21" => Some(OutputFormat::Gml2),
            "gml3" | "gml31" => Some(OutputFormat::Gml31),
            "gml32" => Some(OutputFormat::Gml32),
            "html" | "xhtml" => Some(OutputFormat::Xhtml),
            _ => Self::from_media_type(f),
        }
    }

    /// Parse a media type, including the GML `version`/`subtype` parameters.
    /// A `q` parameter is ignored.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let mut parts = media_type.split(';');
        let base = parts.next()?.trim().to_lowercase();
        let mut version = None;
        let mut subtype = None;
        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').to_lowercase();
            match key.trim().to_lowercase().as_str() {
                "version" => version = Some(value),
                "subtype" => subtype = Some(value),
                _ => {}
            }
        }

        match base.as_str() {
            "application/geo+json" | "application/json" => Some(OutputFormat::GeoJson),
            "application/ld+json" => Some(OutputFormat::JsonLd),
            "application/gml+xml" => match version.as_deref() {
                None => Some(OutputFormat::Gml32),
                Some(v) => gml_from_version(v),
            },
            "text/xml" => match subtype.as_deref() {
                None => Some(OutputFormat::Gml31),
                Some(s) => s.strip_prefix("gml/").and_then(gml_from_version),
            },
            "text/html" | "application/xhtml+xml" => Some(OutputFormat::Xhtml),
            _ => None,
        }
    }
}

fn gml_from_version(version: &str) -> Option<OutputFormat> {
    if version.starts_with("2") {
        Some(OutputFormat::Gml2)
    } else if version.starts_with("3.1") {
        Some(OutputFormat::Gml31)
    } else if version.starts_with("3.2") {
        Some(OutputFormat::Gml32)
    } else {
        None
    }
}

/// Pick the output format from an explicit format parameter or an Accept
/// header.
///
/// Priority:
/// 1. A non-empty format parameter, which must name a supported format
/// 2. The Accept header entries, highest quality first
/// 3. GeoJSON for wildcards or a missing header
pub fn negotiate_format(accept: Option<&str>, f_param: Option<&str>) -> WriterResult<OutputFormat> {
    if let Some(f) = f_param.filter(|f| !f.is_empty()) {
        return OutputFormat::from_query_param(f)
            .ok_or_else(|| WriterError::UnsupportedFormat(f.to_string()));
    }

    let accept = accept.unwrap_or("*/*");
    let mut accepted: Vec<(&str, f32)> = accept
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            let quality = entry
                .split(';')
                .skip(1)
                .find_map(|p| p.trim().strip_prefix("q=").and_then(|q| q.parse::<f32>().ok()))
                .unwrap_or(1.0);
            Some((entry, quality))
        })
        .collect();

    if accepted.is_empty() {
        return Ok(OutputFormat::default());
    }

    // stable sort keeps header order among equal qualities
    accepted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (entry, _) in &accepted {
        let media_type = entry.split(';').next().unwrap_or("").trim();
        if media_type == "*/*" || media_type == "application/*" {
            return Ok(OutputFormat::default());
        }
        if let Some(format) = OutputFormat::from_media_type(entry) {
            return Ok(format);
        }
    }

    Err(WriterError::UnsupportedFormat(format!(
        "'{}' not supported, expected one of: {}",
        accept,
        SUPPORTED_MEDIA_TYPES.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_query_param() {
        assert_eq!(OutputFormat::from_query_param("GeoJSON"), Some(OutputFormat::GeoJson));
        assert_eq!(OutputFormat::from_query_param("jsonld"), Some(OutputFormat::JsonLd));
        assert_eq!(OutputFormat::from_query_param("gml3"), Some(OutputFormat::Gml31));
        assert_eq!(OutputFormat::from_query_param("gml32"), Some(OutputFormat::Gml32));
        assert_eq!(OutputFormat::from_query_param("html"), Some(OutputFormat::Xhtml));
        assert_eq!(
            OutputFormat::from_query_param("application/ld+json"),
            Some(OutputFormat::JsonLd)
        );
        assert_eq!(OutputFormat::from_query_param("csv"), None);
    }

    #[test]
    fn test_gml_media_types() {
        assert_eq!(
            OutputFormat::from_media_type("application/gml+xml; version=3.2"),
            Some(OutputFormat::Gml32)
        );
        assert_eq!(
            OutputFormat::from_media_type("application/gml+xml;version=2.1"),
            Some(OutputFormat::Gml2)
        );
        assert_eq!(
            OutputFormat::from_media_type("text/xml; subtype=gml/3.1.1"),
            Some(OutputFormat::Gml31)
        );
        assert_eq!(
            OutputFormat::from_media_type("text/xml; subtype=gml/2.1.2"),
            Some(OutputFormat::Gml2)
        );
        assert_eq!(
            OutputFormat::from_media_type("application/gml+xml; version=4.0"),
            None
        );
    }

    #[test]
    fn test_content_type_round_trip() {
        for format in [
            OutputFormat::GeoJson,
            OutputFormat::JsonLd,
            OutputFormat::Gml2,
            OutputFormat::Gml31,
            OutputFormat::Gml32,
            OutputFormat::Xhtml,
        ] {
            assert_eq!(OutputFormat::from_media_type(format.content_type()), Some(format));
        }
    }

    #[test]
    fn test_negotiate_format_with_f_param() {
        let format = negotiate_format(Some("text/html"), Some("gml32")).unwrap();
        assert_eq!(format, OutputFormat::Gml32);
        assert!(negotiate_format(None, Some("bogus")).is_err());
    }

    #[test]
    fn test_negotiate_empty_f_param_uses_accept() {
        let format = negotiate_format(Some("application/ld+json"), Some("")).unwrap();
        assert_eq!(format, OutputFormat::JsonLd);
    }

    #[test]
    fn test_negotiate_quality_order() {
        let format = negotiate_format(
            Some("text/html;q=0.5, application/gml+xml; version=3.1;q=0.9"),
            None,
        )
        .unwrap();
        assert_eq!(format, OutputFormat::Gml31);
    }

    #[test]
    fn test_negotiate_wildcard_and_missing() {
        assert_eq!(negotiate_format(None, None).unwrap(), OutputFormat::GeoJson);
        assert_eq!(
            negotiate_format(Some("image/png, */*;q=0.1"), None).unwrap(),
            OutputFormat::GeoJson
        );
    }

    #[test]
    fn test_negotiate_unsupported() {
        let err = negotiate_format(Some("image/png"), None).unwrap_err();
        assert!(matches!(err, WriterError::UnsupportedFormat(_)));
    }
}
