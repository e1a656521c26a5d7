//! # Document Loading
//!
//! Type graphs and payloads are read from JSON or YAML files. The format
//! follows the file extension: `.yaml` / `.yml` is YAML, anything else
//! is JSON.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Serialization format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parse `src` as `format`.
pub fn parse<T: DeserializeOwned>(src: &str, format: Format) -> anyhow::Result<T> {
    match format {
        Format::Json => serde_json::from_str(src).context("invalid JSON document"),
        Format::Yaml => serde_yaml::from_str(src).context("invalid YAML document"),
    }
}

/// Read and parse the document at `path`.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&src, Format::from_path(path)).with_context(|| format!("failed to load {}", path.display()))
}
