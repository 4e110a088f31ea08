//! Layer sources and their provenance

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use defmerge_core::Value;

use super::effective::LayerError;

/// Origin of a configuration layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrigin {
    Defaults,
    File,
    Inline,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerSource {
    /// Origin of this layer
    pub origin: LayerOrigin,

    /// Human-readable name
    pub label: String,

    /// File path (None for defaults/inline)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for defaults/inline)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    Toml,
    Json,
}

impl Format {
    pub(crate) fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Format::Toml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Load and parse a layer file, returning the value and its source record
pub(crate) fn load_file(path: &Path) -> Result<(Value, LayerSource), LayerError> {
    let format =
        Format::from_path(path).ok_or_else(|| LayerError::UnsupportedFormat(path.to_path_buf()))?;

    let bytes = fs::read(path).map_err(|source| LayerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let digest = hex::encode(Sha256::digest(&bytes));

    let parse_error = |message: String| LayerError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let contents =
        String::from_utf8(bytes).map_err(|e| parse_error(format!("Invalid UTF-8: {}", e)))?;

    let value = match format {
        Format::Toml => {
            let table: toml::Value = toml::from_str(&contents)
                .map_err(|e| parse_error(format!("TOML parse error: {}", e)))?;
            Value::from(table)
        }
        Format::Json => {
            let json: serde_json::Value = serde_json::from_str(&contents)
                .map_err(|e| parse_error(format!("JSON parse error: {}", e)))?;
            Value::from(json)
        }
    };

    let source = LayerSource {
        origin: LayerOrigin::File,
        label: path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default(),
        path: Some(path.to_string_lossy().to_string()),
        digest: Some(digest),
    };

    Ok((value, source))
}
