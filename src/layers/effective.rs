//! Layered configuration with provenance
//!
//! `LayeredConfig` captures the merged configuration plus the list of
//! layers that produced it, lowest precedence first.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use defmerge_core::{merge_layers, ConvertError, Value};

use super::source::{load_file, Format, LayerOrigin, LayerSource};

/// Builder collecting layers in precedence order
#[derive(Debug, Clone)]
pub struct Layers {
    layers: Vec<(Value, LayerSource)>,
}

impl Layers {
    /// Start from the baseline default structure.
    pub fn new(defaults: impl Into<Value>) -> Self {
        Self {
            layers: vec![(
                defaults.into(),
                LayerSource {
                    origin: LayerOrigin::Defaults,
                    label: "defaults".to_string(),
                    path: None,
                    digest: None,
                },
            )],
        }
    }

    /// Add a `.toml` or `.json` file. The file must exist.
    pub fn file(mut self, path: impl AsRef<Path>) -> Result<Self, LayerError> {
        let (value, source) = load_file(path.as_ref())?;
        debug!(path = %path.as_ref().display(), digest = ?source.digest, "loaded config layer");
        self.layers.push((value, source));
        Ok(self)
    }

    /// Add a file if it exists, otherwise leave the layers unchanged.
    pub fn file_if_exists(self, path: impl AsRef<Path>) -> Result<Self, LayerError> {
        let path = path.as_ref();
        if path.exists() {
            self.file(path)
        } else {
            trace!(path = %path.display(), "config layer not present, skipping");
            Ok(self)
        }
    }

    /// Add every `.toml` / `.json` file directly inside `dir`, in file name
    /// order. Other entries are ignored.
    pub fn directory(mut self, dir: impl AsRef<Path>) -> Result<Self, LayerError> {
        let dir = dir.as_ref();
        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in entries {
            let entry = entry.map_err(|e| LayerError::Io {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: io::Error::from(e),
            })?;
            if !entry.file_type().is_file() || Format::from_path(entry.path()).is_none() {
                continue;
            }
            self = self.file(entry.path())?;
        }
        Ok(self)
    }

    /// Add an in-memory override layer.
    pub fn inline(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.layers.push((
            value.into(),
            LayerSource {
                origin: LayerOrigin::Inline,
                label: label.into(),
                path: None,
                digest: None,
            },
        ));
        self
    }

    /// Number of layers collected so far, defaults included
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Merge all layers.
    pub fn build(self) -> LayeredConfig {
        let (values, sources): (Vec<Value>, Vec<LayerSource>) = self.layers.into_iter().unzip();
        let config = merge_layers(values);
        debug!(layers = sources.len(), "merged config layers");

        LayeredConfig {
            created_at: Utc::now(),
            config,
            sources,
        }
    }
}

/// Merged configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayeredConfig {
    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration
    pub config: Value,

    /// Contributing layers in precedence order
    pub sources: Vec<LayerSource>,
}

impl LayeredConfig {
    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.config.pointer(path)
    }

    /// Get a config value as u64
    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(Value::as_u64)
    }

    /// Get a config value as string
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Get a config value as bool
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Deserialize the merged configuration into a typed structure.
    pub fn resolve<T: DeserializeOwned>(&self) -> Result<T, LayerError> {
        let json = serde_json::Value::try_from(self.config.clone())?;
        serde_json::from_value(json).map_err(|e| LayerError::Resolve(e.to_string()))
    }

    /// SHA-256 hex digest of the merged configuration in RFC 8785 canonical
    /// form. Independent of key order and of where each value came from.
    pub fn fingerprint(&self) -> Result<String, LayerError> {
        let json = serde_json::Value::try_from(self.config.clone())?;
        let jcs_bytes = serde_json_canonicalizer::to_vec(&json)
            .map_err(|e| LayerError::Fingerprint(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Serialize to JSON (pretty printed)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }
}

/// Layering errors
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Resolve error: {0}")]
    Resolve(String),

    #[error("Fingerprint error: {0}")]
    Fingerprint(String),
}
