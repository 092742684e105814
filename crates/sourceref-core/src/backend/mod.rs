mod catalog;

use serde::{Deserialize, Serialize};

use crate::error::BackendResult;

pub use catalog::{CatalogBackend, CatalogEntry, CatalogFile, CatalogOptions};

/// One search hit as reported by the object backend.
///
/// The type field arrives under different keys depending on the transport,
/// so all of them deserialize into `object_type`. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub uri: String,
    pub name: String,
    #[serde(default, alias = "objectType", alias = "type")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl ObjectSummary {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            object_type: None,
            package: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }

    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// `"NAME TYPE"`, or just the name when the type is absent.
    pub fn summary(&self) -> String {
        match self.object_type.as_deref().map(str::trim) {
            Some(object_type) if !object_type.is_empty() => format!("{} {object_type}", self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub object_uri: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUpdate {
    pub object_uri: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub object_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Name search over repository objects.
#[async_trait::async_trait]
pub trait ObjectSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> BackendResult<Vec<ObjectSummary>>;
}

/// Source read/write for resolved objects.
#[async_trait::async_trait]
pub trait SourceStore: Send + Sync {
    async fn read_source(&self, object_uri: &str) -> BackendResult<SourceDocument>;

    async fn write_source(&self, update: SourceUpdate) -> BackendResult<UpdateOutcome>;
}
