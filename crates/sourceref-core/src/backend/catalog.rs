use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{ObjectSearch, ObjectSummary, SourceDocument, SourceStore, SourceUpdate, UpdateOutcome};
use crate::error::{BackendError, BackendResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub uri: String,
    pub name: String,
    #[serde(default, alias = "objectType", alias = "type")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default)]
    pub source: String,
}

impl CatalogEntry {
    fn summary(&self) -> ObjectSummary {
        ObjectSummary {
            uri: self.uri.clone(),
            name: self.name.clone(),
            object_type: self.object_type.clone(),
            package: self.package.clone(),
        }
    }
}

/// On-disk catalog layout: `{"objects": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub objects: Vec<CatalogEntry>,
}

/// Write policy for a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOptions {
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub require_etag_for_updates: bool,
}

impl CatalogOptions {
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Flags are set by `1` or `true` (any case).
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| {
            var(name).is_some_and(|v| {
                let v = v.trim();
                v == "1" || v.eq_ignore_ascii_case("true")
            })
        };
        Self {
            read_only: flag("SOURCEREF_READ_ONLY"),
            require_etag_for_updates: flag("SOURCEREF_REQUIRE_ETAG"),
        }
    }
}

#[derive(Debug)]
struct StoredObject {
    entry: CatalogEntry,
    revision: u64,
}

impl StoredObject {
    fn etag(&self) -> String {
        format!("r{}", self.revision)
    }
}

/// In-memory object backend: name search plus versioned sources.
///
/// Search is a case-insensitive substring match on the object name, in
/// catalog order, truncated to the requested cap. A trailing `*` in the query
/// is ignored so wildcard-style queries behave like plain ones.
#[derive(Debug)]
pub struct CatalogBackend {
    objects: RwLock<Vec<StoredObject>>,
    options: CatalogOptions,
}

impl CatalogBackend {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let objects = entries
            .into_iter()
            .map(|entry| StoredObject { entry, revision: 1 })
            .collect();
        Self {
            objects: RwLock::new(objects),
            options: CatalogOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CatalogOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_json(json: &str) -> BackendResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.objects))
    }

    pub fn load(path: &Path) -> BackendResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let backend = Self::from_json(&json)?;
        tracing::debug!("Loaded catalog from {}", path.display());
        Ok(backend)
    }

    pub const fn options(&self) -> CatalogOptions {
        self.options
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ObjectSearch for CatalogBackend {
    async fn search(&self, query: &str, max_results: usize) -> BackendResult<Vec<ObjectSummary>> {
        let needle = query.trim().trim_end_matches('*').to_uppercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let objects = self.objects.read().await;
        let hits: Vec<ObjectSummary> = objects
            .iter()
            .filter(|object| object.entry.name.to_uppercase().contains(&needle))
            .take(max_results)
            .map(|object| object.entry.summary())
            .collect();

        tracing::debug!("Catalog search {:?} (max {}) -> {} hits", query, max_results, hits.len());
        Ok(hits)
    }
}

#[async_trait::async_trait]
impl SourceStore for CatalogBackend {
    async fn read_source(&self, object_uri: &str) -> BackendResult<SourceDocument> {
        let objects = self.objects.read().await;
        let object = objects
            .iter()
            .find(|object| object.entry.uri == object_uri)
            .ok_or_else(|| BackendError::ObjectNotFound(object_uri.to_string()))?;

        Ok(SourceDocument {
            object_uri: object.entry.uri.clone(),
            source: object.entry.source.clone(),
            etag: Some(object.etag()),
        })
    }

    async fn write_source(&self, update: SourceUpdate) -> BackendResult<UpdateOutcome> {
        if self.options.read_only {
            return Err(BackendError::ReadOnly);
        }

        let mut objects = self.objects.write().await;
        let object = objects
            .iter_mut()
            .find(|object| object.entry.uri == update.object_uri)
            .ok_or_else(|| BackendError::ObjectNotFound(update.object_uri.clone()))?;

        match update.etag {
            Some(ref etag) if *etag != object.etag() => {
                return Err(BackendError::EtagMismatch {
                    object_uri: update.object_uri,
                    expected: object.etag(),
                    actual: etag.clone(),
                });
            }
            None if self.options.require_etag_for_updates => {
                return Err(BackendError::EtagRequired(update.object_uri));
            }
            _ => {}
        }

        object.entry.source = update.source;
        object.revision += 1;
        tracing::info!("Updated {} to revision {}", object.entry.uri, object.revision);

        Ok(UpdateOutcome {
            object_uri: update.object_uri,
            etag: Some(object.etag()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(uri: &str, name: &str, object_type: &str) -> CatalogEntry {
        CatalogEntry {
            uri: uri.into(),
            name: name.into(),
            object_type: Some(object_type.into()),
            package: None,
            source: format!("* source of {name}"),
        }
    }

    fn catalog() -> CatalogBackend {
        CatalogBackend::new(vec![
            entry("/sap/bc/adt/oo/classes/zcl_demo", "ZCL_DEMO", "CLAS/OC"),
            entry("/sap/bc/adt/oo/classes/zcl_demo_helper", "ZCL_DEMO_HELPER", "CLAS/OC"),
            entry("/sap/bc/adt/programs/programs/zdemo", "ZDEMO", "PROG/P"),
        ])
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let backend = catalog();
        let hits = backend.search("zcl_demo", 12).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "ZCL_DEMO");

        let wildcard = backend.search("ZDEMO*", 12).await.unwrap();
        assert_eq!(wildcard.len(), 1);
        assert!(backend.search("  ", 12).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_respects_cap() {
        let backend = catalog();
        let hits = backend.search("DEMO", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].uri, "/sap/bc/adt/oo/classes/zcl_demo");
    }

    #[tokio::test]
    async fn test_write_bumps_etag() {
        let backend = catalog();
        let uri = "/sap/bc/adt/programs/programs/zdemo";
        let doc = backend.read_source(uri).await.unwrap();
        assert_eq!(doc.etag.as_deref(), Some("r1"));

        let outcome = backend
            .write_source(SourceUpdate {
                object_uri: uri.into(),
                source: "REPORT zdemo.".into(),
                etag: doc.etag,
            })
            .await
            .unwrap();
        assert_eq!(outcome.etag.as_deref(), Some("r2"));
        assert_eq!(backend.read_source(uri).await.unwrap().source, "REPORT zdemo.");
    }

    #[tokio::test]
    async fn test_stale_etag_is_rejected() {
        let backend = catalog();
        let result = backend
            .write_source(SourceUpdate {
                object_uri: "/sap/bc/adt/programs/programs/zdemo".into(),
                source: String::new(),
                etag: Some("r0".into()),
            })
            .await;
        assert!(matches!(result, Err(BackendError::EtagMismatch { .. })));
    }

    #[tokio::test]
    async fn test_write_policy() {
        let required = catalog().with_options(CatalogOptions {
            read_only: false,
            require_etag_for_updates: true,
        });
        let update = SourceUpdate {
            object_uri: "/sap/bc/adt/programs/programs/zdemo".into(),
            source: String::new(),
            etag: None,
        };
        assert!(matches!(
            required.write_source(update.clone()).await,
            Err(BackendError::EtagRequired(_))
        ));

        let read_only = catalog().with_options(CatalogOptions {
            read_only: true,
            require_etag_for_updates: false,
        });
        assert!(matches!(read_only.write_source(update).await, Err(BackendError::ReadOnly)));
    }

    #[test]
    fn test_options_from_vars() {
        let options = CatalogOptions::from_vars(|name| match name {
            "SOURCEREF_READ_ONLY" => Some("true".to_string()),
            "SOURCEREF_REQUIRE_ETAG" => Some("yes".to_string()),
            _ => None,
        });
        assert!(options.read_only);
        assert!(!options.require_etag_for_updates);

        let options = CatalogOptions::from_vars(|name| {
            (name == "SOURCEREF_REQUIRE_ETAG").then(|| "1".to_string())
        });
        assert_eq!(
            options,
            CatalogOptions {
                read_only: false,
                require_etag_for_updates: true,
            }
        );
        assert_eq!(CatalogOptions::from_vars(|_| None), CatalogOptions::default());
    }

    #[tokio::test]
    async fn test_missing_object() {
        let backend = catalog();
        assert!(matches!(
            backend.read_source("/sap/bc/adt/nothing").await,
            Err(BackendError::ObjectNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_from_json() {
        let backend = CatalogBackend::from_json(
            r#"{"objects":[{"uri":"/u","name":"ZFOO","type":"INTF","source":"INTERFACE zfoo."}]}"#,
        )
        .unwrap();
        assert_eq!(backend.len().await, 1);
        let hits = backend.search("zfoo", 12).await.unwrap();
        assert_eq!(hits[0].object_type.as_deref(), Some("INTF"));
        assert!(CatalogBackend::from_json("not json").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("catalog.json");
        std::fs::write(&path, r#"{"objects":[{"uri":"/u","name":"ZFOO"}]}"#).unwrap();

        let backend = CatalogBackend::load(&path).unwrap();
        assert!(!backend.is_empty().await);
        assert!(matches!(
            CatalogBackend::load(&tmp.path().join("missing.json")),
            Err(BackendError::Io(_))
        ));
    }
}
