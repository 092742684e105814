#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod reference;
pub mod search;
pub mod workbench;

pub use backend::{
    CatalogBackend, CatalogEntry, CatalogFile, CatalogOptions, ObjectSearch, ObjectSummary,
    SourceDocument, SourceStore, SourceUpdate, UpdateOutcome,
};
pub use config::ResolverConfig;
pub use engine::{ResolvedBy, ResolvedRef, Resolver};
pub use error::{BackendError, BackendResult, ErrorDetails, ResolveError, ResolveErrorCode, Result};
pub use generation::{Generation, RequestGenerations};
pub use reference::{route_ref, RefKind, RefRoute};
pub use search::{derive_search_terms, infer_expected_types, ExpectedTypes};
pub use workbench::{Opened, Outcome, SourceWorkbench, WorkbenchError, WorkbenchResult};
