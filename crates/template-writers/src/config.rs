//! Writer configuration loading and types.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use feature_common::{WriterError, WriterResult};

use crate::json::{GeometryEncoding, JsonOptions};
use crate::xml::gml::GmlOptions;

/// Options shared by every writer created through [`crate::create_writer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// The response encodes a single feature instead of a collection.
    pub single_feature_request: bool,

    /// Explode repeated JSON values into suffixed keys.
    pub flat_output: bool,

    /// Separator between flattened key segments.
    pub flat_separator: String,

    /// Encode JSON-LD geometries as WKT strings.
    pub jsonld_geometry_as_wkt: bool,

    /// GML root element declarations.
    pub gml: GmlConfig,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            single_feature_request: false,
            flat_output: false,
            flat_separator: default_flat_separator(),
            jsonld_geometry_as_wkt: false,
            gml: GmlConfig::default(),
        }
    }
}

fn default_flat_separator() -> String {
    "_".to_string()
}

/// Extra namespaces and schema locations for GML output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GmlConfig {
    /// Prefix to namespace URI.
    pub namespaces: BTreeMap<String, String>,

    /// Namespace URI to schema URL.
    pub schema_locations: BTreeMap<String, String>,
}

impl WriterConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).context("Failed to parse writer config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to load writer config: {:?}", path))?;
        tracing::info!(path = ?path, "Loaded writer config");
        Ok(config)
    }

    fn validate(&self) -> WriterResult<()> {
        if self.flat_separator.is_empty() {
            return Err(WriterError::InvalidConfig(
                "flat_separator must not be empty".to_string(),
            ));
        }
        for (prefix, uri) in &self.gml.namespaces {
            if prefix.is_empty() || uri.is_empty() {
                return Err(WriterError::InvalidConfig(format!(
                    "invalid GML namespace declaration '{}' -> '{}'",
                    prefix, uri
                )));
            }
        }
        Ok(())
    }

    /// Options for the GeoJSON writer.
    pub fn geojson_options(&self) -> JsonOptions {
        JsonOptions {
            single_feature_request: self.single_feature_request,
            flat_output: self.flat_output,
            flat_separator: self.flat_separator.clone(),
            geometry_encoding: GeometryEncoding::GeoJson,
        }
    }

    /// Options for the JSON-LD writer.
    pub fn jsonld_options(&self) -> JsonOptions {
        let geometry_encoding = if self.jsonld_geometry_as_wkt {
            GeometryEncoding::Wkt
        } else {
            GeometryEncoding::GeoJson
        };
        JsonOptions {
            geometry_encoding,
            ..self.geojson_options()
        }
    }

    pub fn gml_options(&self) -> GmlOptions {
        GmlOptions {
            namespaces: self.gml.namespaces.clone(),
            schema_locations: self.gml.schema_locations.clone(),
        }
    }
}
