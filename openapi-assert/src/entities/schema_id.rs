use anyhow::{Context, anyhow};
use reqwest::Url;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use crate::StdResult;

const DISCOVERY_PATTERNS: [&str; 3] = ["openapi*.yaml", "openapi*.yml", "openapi*.json"];

/// Identifier of an OpenAPI document, either a file path or a `file://` URI.
///
/// It's used as the key of the compiled validators cache, two identifiers pointing to the same
/// file through different spellings are compiled separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(String);

impl SchemaId {
    /// [SchemaId] factory
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    /// Raw value of the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve the file holding the document.
    ///
    /// Only plain paths and `file://` URIs are supported.
    pub fn to_file_path(&self) -> StdResult<PathBuf> {
        if !self.0.contains("://") {
            return Ok(PathBuf::from(&self.0));
        }

        let url = Url::parse(&self.0)
            .with_context(|| format!("Invalid OpenAPI document URI '{}'", self.0))?;
        if url.scheme() != "file" {
            return Err(anyhow!(
                "Unsupported scheme '{}' for OpenAPI document '{}', only local files are supported",
                url.scheme(),
                self.0
            ));
        }

        url.to_file_path()
            .map_err(|_| anyhow!("Could not convert URI '{}' to a local file path", self.0))
    }

    /// List the OpenAPI documents (`openapi*.yaml`, `openapi*.yml`, `openapi*.json`) found in
    /// the given directory, sorted by name.
    pub fn discover(root_path: &Path) -> StdResult<Vec<SchemaId>> {
        let mut schema_ids = Vec::new();
        for pattern in DISCOVERY_PATTERNS {
            let full_pattern = root_path.join(pattern);
            let entries = glob::glob(&full_pattern.to_string_lossy())
                .with_context(|| format!("Invalid discovery pattern '{}'", full_pattern.display()))?;

            for entry in entries {
                let path = entry.with_context(|| {
                    format!("Could not read entry in '{}'", root_path.display())
                })?;
                schema_ids.push(SchemaId::from(path.as_path()));
            }
        }
        schema_ids.sort();

        Ok(schema_ids)
    }
}

impl Display for SchemaId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SchemaId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SchemaId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&Path> for SchemaId {
    fn from(value: &Path) -> Self {
        Self::new(value.to_string_lossy())
    }
}
