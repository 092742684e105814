use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveErrorCode {
    InvalidRef,
    NotFound,
    Ambiguous,
    SearchFailed,
}

impl ResolveErrorCode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRef => "invalid_ref",
            Self::NotFound => "not_found",
            Self::Ambiguous => "ambiguous",
            Self::SearchFailed => "search_failed",
        }
    }
}

impl std::fmt::Display for ResolveErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context attached to a failed resolution so a caller can prompt the user
/// without querying the backend again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub searched_terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_types: Option<Vec<String>>,
    /// `"NAME TYPE"` summaries, deduplicated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ResolveError {
    pub code: ResolveErrorCode,
    pub message: String,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl ResolveError {
    pub fn new(
        code: ResolveErrorCode,
        reference: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            reference: reference.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Candidate summaries carried by an `ambiguous` error, empty otherwise.
    pub fn candidates(&self) -> &[String] {
        self.details
            .as_ref()
            .map_or(&[][..], |details| details.candidates.as_slice())
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failures raised by a search or source backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("ETag mismatch for {object_uri}: expected {expected}, got {actual}")]
    EtagMismatch {
        object_uri: String,
        expected: String,
        actual: String,
    },

    #[error("ETag required to update {0}")]
    EtagRequired(String),

    #[error("Backend is read-only")]
    ReadOnly,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;
