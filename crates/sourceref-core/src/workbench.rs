use thiserror::Error;

use crate::backend::{ObjectSearch, SourceDocument, SourceStore, SourceUpdate, UpdateOutcome};
use crate::config::ResolverConfig;
use crate::engine::{ResolvedRef, Resolver};
use crate::error::{BackendError, ResolveError};
use crate::generation::{Generation, RequestGenerations};
use crate::reference::{base_name, route_ref, RefKind};

#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

pub type WorkbenchResult<T> = Result<T, WorkbenchError>;

/// Result of a request that may have been overtaken by a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Current(T),
    /// A newer request started while this one was in flight.
    Superseded,
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Current(value) => Outcome::Current(f(value)),
            Self::Superseded => Outcome::Superseded,
        }
    }

    pub fn current(self) -> Option<T> {
        match self {
            Self::Current(value) => Some(value),
            Self::Superseded => None,
        }
    }

    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    Object {
        resolved: ResolvedRef,
        document: SourceDocument,
    },
    /// Workspace files are read by the caller; only the route is reported.
    Workspace {
        path: String,
        display_name: String,
        language: String,
    },
}

/// Opens, reloads and saves sources for loose references, discarding the
/// results of requests that a newer one has overtaken.
pub struct SourceWorkbench<B> {
    backend: B,
    config: ResolverConfig,
    generations: RequestGenerations,
}

impl<B: ObjectSearch + SourceStore> SourceWorkbench<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: ResolverConfig::default(),
            generations: RequestGenerations::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a generation counter with other request issuers.
    #[must_use]
    pub fn with_generations(mut self, generations: RequestGenerations) -> Self {
        self.generations = generations;
        self
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn generations(&self) -> &RequestGenerations {
        &self.generations
    }

    fn settle<T, E>(&self, generation: Generation, result: Result<T, E>) -> WorkbenchResult<Outcome<T>>
    where
        WorkbenchError: From<E>,
    {
        if !self.generations.is_current(generation) {
            tracing::debug!("Discarding result of superseded request {}", generation.value());
            return Ok(Outcome::Superseded);
        }
        Ok(Outcome::Current(result?))
    }

    pub async fn open(&self, reference: &str) -> WorkbenchResult<Outcome<Opened>> {
        let generation = self.generations.begin();
        let route = route_ref(reference);

        if route.kind == RefKind::WorkspacePath {
            let display_name = base_name(&route.normalized_ref).to_string();
            return Ok(Outcome::Current(Opened::Workspace {
                path: route.normalized_ref,
                display_name,
                language: route.display_language,
            }));
        }

        let resolver = Resolver::new(&self.backend).with_config(self.config);
        let resolved = match self.settle(generation, resolver.resolve(&route.normalized_ref).await)? {
            Outcome::Current(resolved) => resolved,
            Outcome::Superseded => return Ok(Outcome::Superseded),
        };

        let document = self.backend.read_source(&resolved.object_uri).await;
        Ok(self
            .settle(generation, document)?
            .map(|document| Opened::Object { resolved, document }))
    }

    pub async fn reload(&self, object_uri: &str) -> WorkbenchResult<Outcome<SourceDocument>> {
        let generation = self.generations.begin();
        let document = self.backend.read_source(object_uri).await;
        self.settle(generation, document)
    }

    pub async fn save(
        &self,
        object_uri: &str,
        source: String,
        etag: Option<String>,
    ) -> WorkbenchResult<Outcome<UpdateOutcome>> {
        let generation = self.generations.begin();
        let outcome = self
            .backend
            .write_source(SourceUpdate {
                object_uri: object_uri.to_string(),
                source,
                etag,
            })
            .await;
        self.settle(generation, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CatalogBackend, CatalogEntry, ObjectSummary};
    use crate::engine::ResolvedBy;
    use crate::error::{BackendResult, ResolveErrorCode};

    fn catalog() -> CatalogBackend {
        CatalogBackend::new(vec![CatalogEntry {
            uri: "/sap/bc/adt/oo/classes/zcl_demo".into(),
            name: "ZCL_DEMO".into(),
            object_type: Some("CLAS/OC".into()),
            package: Some("$TMP".into()),
            source: "CLASS zcl_demo DEFINITION.".into(),
        }])
    }

    /// Starts a newer request while a read is in flight.
    struct Overtaking {
        inner: CatalogBackend,
        generations: RequestGenerations,
    }

    #[async_trait::async_trait]
    impl ObjectSearch for Overtaking {
        async fn search(&self, query: &str, max_results: usize) -> BackendResult<Vec<ObjectSummary>> {
            self.inner.search(query, max_results).await
        }
    }

    #[async_trait::async_trait]
    impl SourceStore for Overtaking {
        async fn read_source(&self, object_uri: &str) -> BackendResult<SourceDocument> {
            self.generations.begin();
            self.inner.read_source(object_uri).await
        }

        async fn write_source(&self, update: SourceUpdate) -> BackendResult<UpdateOutcome> {
            self.generations.begin();
            self.inner.write_source(update).await
        }
    }

    #[tokio::test]
    async fn test_open_object_reads_source() {
        let workbench = SourceWorkbench::new(catalog());
        let opened = workbench.open("zcl_demo.clas.abap").await.unwrap();

        let Outcome::Current(Opened::Object { resolved, document }) = opened else {
            panic!("expected an opened object");
        };
        assert_eq!(resolved.object_uri, "/sap/bc/adt/oo/classes/zcl_demo");
        assert_eq!(resolved.resolved_by, ResolvedBy::Search);
        assert_eq!(document.source, "CLASS zcl_demo DEFINITION.");
        assert_eq!(document.etag.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_open_workspace_path_reports_route() {
        let workbench = SourceWorkbench::new(catalog());
        let opened = workbench.open("b\\web\\package.json").await.unwrap();
        assert_eq!(
            opened,
            Outcome::Current(Opened::Workspace {
                path: "b/web/package.json".into(),
                display_name: "package.json".into(),
                language: "json".into(),
            })
        );
    }

    #[tokio::test]
    async fn test_open_propagates_resolution_errors() {
        let workbench = SourceWorkbench::new(catalog());
        let err = workbench.open("zcl_missing.clas.abap").await.unwrap_err();
        let WorkbenchError::Resolve(err) = err else {
            panic!("expected a resolve error");
        };
        assert_eq!(err.code, ResolveErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_overtaken_open_is_superseded() {
        let generations = RequestGenerations::new();
        let workbench = SourceWorkbench::new(Overtaking {
            inner: catalog(),
            generations: generations.clone(),
        })
        .with_generations(generations);

        let opened = workbench.open("/sap/bc/adt/oo/classes/zcl_demo").await.unwrap();
        assert!(opened.is_superseded());

        let saved = workbench
            .save("/sap/bc/adt/oo/classes/zcl_demo", "x".into(), None)
            .await
            .unwrap();
        assert_eq!(saved, Outcome::Superseded);
    }

    #[tokio::test]
    async fn test_save_then_reload() {
        let workbench = SourceWorkbench::new(catalog());
        let uri = "/sap/bc/adt/oo/classes/zcl_demo";

        let saved = workbench
            .save(uri, "CLASS zcl_demo DEFINITION FINAL.".into(), Some("r1".into()))
            .await
            .unwrap()
            .current()
            .unwrap();
        assert_eq!(saved.etag.as_deref(), Some("r2"));

        let reloaded = workbench.reload(uri).await.unwrap().current().unwrap();
        assert_eq!(reloaded.source, "CLASS zcl_demo DEFINITION FINAL.");

        let stale = workbench.save(uri, String::new(), Some("r1".into())).await;
        assert!(matches!(stale, Err(WorkbenchError::Backend(BackendError::EtagMismatch { .. }))));
    }
}
