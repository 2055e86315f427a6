//! Generator options, from the protoc plugin parameter or a YAML file.
//!
//! # Plugin parameter
//!
//! ```text
//! protoc --rest-openapi_out=. --rest-openapi_opt=format=json,array_items=true api.proto
//! ```
//!
//! # File format
//!
//! ```yaml
//! # api/openapi/config.yaml
//! format: yaml
//!
//! # Attach the per-field path parameters computed for DELETE operations.
//! attach_delete_params: false
//!
//! # Fill `items` of repeated fields with the element schema.
//! array_items: false
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{self, Error};

/// Serialization format of generated documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `*_openapi.yaml`
    #[default]
    Yaml,
    /// `*_openapi.json`
    Json,
}

impl OutputFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Generator options. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Output serialization format.
    pub format: OutputFormat,

    /// Attach the path parameters synthesized for DELETE operations.
    ///
    /// Off by default: DELETE operations are emitted without parameters.
    pub attach_delete_params: bool,

    /// Populate array `items` with the element schema of repeated fields.
    ///
    /// Off by default: repeated fields produce an untyped array.
    pub array_items: bool,
}

impl GeneratorConfig {
    /// Load config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Parse a protoc plugin parameter: comma-separated `key=value` pairs.
    ///
    /// A bare boolean key (`array_items`) means `true`. Empty input yields
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for unknown keys or bad values.
    pub fn from_parameter(parameter: &str) -> error::Result<Self> {
        let mut config = Self::default();

        for pair in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "true"));
            let (key, value) = (key.trim(), value.trim());

            match key {
                "format" => {
                    config.format = match value {
                        "yaml" | "yml" => OutputFormat::Yaml,
                        "json" => OutputFormat::Json,
                        _ => return Err(invalid(pair, "expected `yaml` or `json`")),
                    };
                }
                "attach_delete_params" => config.attach_delete_params = parse_bool(pair, value)?,
                "array_items" => config.array_items = parse_bool(pair, value)?,
                _ => return Err(invalid(pair, "unknown option")),
            }
        }

        Ok(config)
    }
}

fn parse_bool(pair: &str, value: &str) -> error::Result<bool> {
    value
        .parse()
        .map_err(|_| invalid(pair, "expected `true` or `false`"))
}

fn invalid(pair: &str, reason: &str) -> Error {
    Error::InvalidParameter {
        parameter: pair.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_defaults() {
        let config: GeneratorConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.format, OutputFormat::Yaml);
        assert!(!config.attach_delete_params);
        assert!(!config.array_items);
    }

    #[test]
    fn deserialize_full() {
        let yaml = "format: json\nattach_delete_params: true\narray_items: true\n";
        let config: GeneratorConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.attach_delete_params);
        assert!(config.array_items);
    }

    #[test]
    fn parameter_parsing() {
        let config = GeneratorConfig::from_parameter("format=json, array_items").unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.array_items);
        assert!(!config.attach_delete_params);

        let config = GeneratorConfig::from_parameter("attach_delete_params=false").unwrap();
        assert!(!config.attach_delete_params);

        assert_eq!(
            GeneratorConfig::from_parameter("").unwrap(),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn parameter_errors() {
        let err = GeneratorConfig::from_parameter("format=xml").unwrap_err();
        assert!(err.to_string().contains("format=xml"));

        assert!(GeneratorConfig::from_parameter("colour=blue").is_err());
        assert!(GeneratorConfig::from_parameter("array_items=maybe").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join("proto-rest-openapi-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(&path, "array_items: true\n").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert!(config.array_items);
        assert_eq!(config.format, OutputFormat::Yaml);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let result = GeneratorConfig::load(Path::new("/nonexistent/config.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_invalid_yaml_returns_error() {
        let dir = std::env::temp_dir().join("proto-rest-openapi-config-invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.yaml");
        std::fs::write(&path, "format: [[[invalid").unwrap();

        assert!(GeneratorConfig::load(&path).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
