//! Disambiguation of loose references against a capped name search.
//!
//! Each derived term runs through a small state machine: a narrow search,
//! then, when the hit looks unique, a revalidation at a much larger cap to
//! make sure truncation did not hide a same-named object. Verdicts from all
//! terms are accumulated and only turned into an error once every term has
//! been tried.

use serde::{Deserialize, Serialize};

use crate::backend::{ObjectSearch, ObjectSummary};
use crate::config::ResolverConfig;
use crate::error::{BackendError, ErrorDetails, ResolveError, ResolveErrorCode, Result};
use crate::reference::{
    base_name, extension, is_object_uri, normalize_ref, strip_diff_prefix, OBJECT_LANGUAGE,
};
use crate::search::{
    derive_search_terms, exact_name_matches, filter_by_expected_types, infer_expected_types,
    ExpectedTypes,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBy {
    Uri,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRef {
    pub object_uri: String,
    pub display_name: String,
    pub resolved_by: ResolvedBy,
}

impl ResolvedRef {
    fn from_summary(summary: ObjectSummary) -> Self {
        Self {
            object_uri: summary.uri,
            display_name: summary.name,
            resolved_by: ResolvedBy::Search,
        }
    }
}

#[derive(Debug)]
enum TermState {
    Searching,
    ExactUniquePending,
    BroadUniquePending,
    Settled(TermVerdict),
}

#[derive(Debug, PartialEq, Eq)]
enum TermVerdict {
    Resolved(ObjectSummary),
    ExactAmbiguous(Vec<ObjectSummary>),
    BroadAmbiguous(Vec<ObjectSummary>),
    SingleCandidate(ObjectSummary),
    /// Revalidation lost the hit the narrow search reported.
    Inconclusive,
    NoCandidates,
}

fn into_single(mut items: Vec<ObjectSummary>) -> std::result::Result<ObjectSummary, Vec<ObjectSummary>> {
    if items.len() == 1 {
        Ok(items.swap_remove(0))
    } else {
        Err(items)
    }
}

fn classify_narrow(term: &str, results: Vec<ObjectSummary>) -> TermState {
    if results.is_empty() {
        return TermState::Settled(TermVerdict::NoCandidates);
    }

    let exact = exact_name_matches(&results, term);
    match exact.len() {
        1 => TermState::ExactUniquePending,
        0 if results.len() == 1 => TermState::BroadUniquePending,
        0 => TermState::Settled(TermVerdict::BroadAmbiguous(results)),
        _ => TermState::Settled(TermVerdict::ExactAmbiguous(exact)),
    }
}

fn classify_exact_revalidation(term: &str, results: &[ObjectSummary]) -> TermVerdict {
    match into_single(exact_name_matches(results, term)) {
        Ok(found) => TermVerdict::Resolved(found),
        Err(many) if !many.is_empty() => TermVerdict::ExactAmbiguous(many),
        Err(_) => TermVerdict::Inconclusive,
    }
}

fn classify_broad_revalidation(results: Vec<ObjectSummary>) -> TermVerdict {
    match into_single(results) {
        Ok(found) => TermVerdict::SingleCandidate(found),
        Err(many) if !many.is_empty() => TermVerdict::BroadAmbiguous(many),
        Err(_) => TermVerdict::Inconclusive,
    }
}

#[derive(Debug)]
struct Candidate {
    summary: ObjectSummary,
    terms: Vec<String>,
}

/// What the term loop has learned so far. Only the first ambiguity of each
/// kind is kept.
#[derive(Debug, Default)]
struct Evidence {
    searched_terms: Vec<String>,
    exact_ambiguity: Option<(String, Vec<ObjectSummary>)>,
    broad_ambiguity: Option<(String, Vec<ObjectSummary>)>,
    single_candidates: Vec<Candidate>,
}

impl Evidence {
    /// Fold one verdict in. Returns the object when the verdict is terminal.
    fn record(&mut self, term: &str, verdict: TermVerdict) -> Option<ObjectSummary> {
        match verdict {
            TermVerdict::Resolved(found) => return Some(found),
            TermVerdict::ExactAmbiguous(candidates) => {
                if self.exact_ambiguity.is_none() {
                    self.exact_ambiguity = Some((term.to_string(), candidates));
                }
            }
            TermVerdict::BroadAmbiguous(candidates) => {
                if self.broad_ambiguity.is_none() {
                    self.broad_ambiguity = Some((term.to_string(), candidates));
                }
            }
            TermVerdict::SingleCandidate(found) => {
                match self
                    .single_candidates
                    .iter_mut()
                    .find(|candidate| candidate.summary.uri == found.uri)
                {
                    Some(existing) => existing.terms.push(term.to_string()),
                    None => self.single_candidates.push(Candidate {
                        summary: found,
                        terms: vec![term.to_string()],
                    }),
                }
            }
            TermVerdict::Inconclusive | TermVerdict::NoCandidates => {}
        }
        None
    }

    fn details(&self, expected: Option<&ExpectedTypes>, candidates: Vec<String>) -> ErrorDetails {
        ErrorDetails {
            searched_terms: self.searched_terms.clone(),
            expected_types: expected.map(ExpectedTypes::to_vec),
            candidates,
            ..ErrorDetails::default()
        }
    }

    /// Decide once every term has been tried.
    fn conclude(
        self,
        reference: &str,
        expected: Option<&ExpectedTypes>,
        max_candidates: usize,
    ) -> Result<ResolvedRef> {
        if let [only] = self.single_candidates.as_slice() {
            if only.terms.len() >= 2 {
                tracing::info!(
                    "Resolved {:?} to {} from {} corroborating terms",
                    reference,
                    only.summary.uri,
                    only.terms.len()
                );
                return Ok(ResolvedRef::from_summary(only.summary.clone()));
            }
        }

        if let Some((term, candidates)) = &self.exact_ambiguity {
            if !candidates.is_empty() {
                let summaries = summarize(candidates.iter().take(max_candidates), max_candidates);
                return Err(ResolveError::new(
                    ResolveErrorCode::Ambiguous,
                    reference,
                    format!("Ambiguous reference \"{reference}\" (term \"{term}\"). Refine the object name."),
                )
                .with_details(self.details(expected, summaries)));
            }
        }

        let broad = self
            .broad_ambiguity
            .as_ref()
            .map_or(&[][..], |(_, candidates)| candidates.as_slice());
        if !broad.is_empty() || !self.single_candidates.is_empty() {
            let summaries = summarize(
                self.single_candidates
                    .iter()
                    .map(|candidate| &candidate.summary)
                    .chain(broad.iter().take(max_candidates)),
                max_candidates,
            );
            return Err(ResolveError::new(
                ResolveErrorCode::Ambiguous,
                reference,
                format!("Ambiguous reference \"{reference}\". Refine the object name."),
            )
            .with_details(self.details(expected, summaries)));
        }

        Err(ResolveError::new(
            ResolveErrorCode::NotFound,
            reference,
            format!("No repository object found for \"{reference}\"."),
        )
        .with_details(self.details(expected, Vec::new())))
    }
}

fn summarize<'a>(entries: impl Iterator<Item = &'a ObjectSummary>, limit: usize) -> Vec<String> {
    let mut summaries: Vec<String> = Vec::new();
    if limit == 0 {
        return summaries;
    }
    for entry in entries {
        let summary = entry.summary();
        if !summaries.contains(&summary) {
            summaries.push(summary);
        }
        if summaries.len() == limit {
            break;
        }
    }
    summaries
}

/// Resolves references against an [`ObjectSearch`] backend.
///
/// A resolver holds no mutable state: every call to [`Resolver::resolve`] is
/// independent, and its searches are issued one at a time in term order.
pub struct Resolver<'a, S: ?Sized> {
    backend: &'a S,
    config: ResolverConfig,
}

impl<'a, S: ObjectSearch + ?Sized> Resolver<'a, S> {
    pub fn new(backend: &'a S) -> Self {
        Self {
            backend,
            config: ResolverConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub async fn resolve(&self, reference: &str) -> Result<ResolvedRef> {
        let normalized = normalize_ref(reference);
        if normalized.is_empty() {
            return Err(ResolveError::new(
                ResolveErrorCode::InvalidRef,
                reference,
                "Empty reference; nothing to resolve.",
            ));
        }

        if is_object_uri(&normalized) {
            let display_name = base_name(&normalized).to_string();
            return Ok(ResolvedRef {
                object_uri: normalized,
                display_name,
                resolved_by: ResolvedBy::Uri,
            });
        }

        let cleaned = strip_diff_prefix(&normalized);
        let name = base_name(&cleaned);
        if let Some(ext) = extension(name) {
            if ext != OBJECT_LANGUAGE {
                return Err(ResolveError::new(
                    ResolveErrorCode::InvalidRef,
                    &normalized,
                    format!("Reference \"{normalized}\" looks like a .{ext} file, not a repository object."),
                )
                .with_details(ErrorDetails {
                    extension: Some(ext),
                    ..ErrorDetails::default()
                }));
            }
        }

        let terms = derive_search_terms(&normalized, self.config.max_terms);
        if terms.is_empty() {
            return Err(ResolveError::new(
                ResolveErrorCode::InvalidRef,
                &normalized,
                format!("No search terms can be derived from \"{normalized}\"."),
            ));
        }
        let expected = infer_expected_types(name);

        let mut evidence = Evidence::default();
        for term in &terms {
            let verdict = match self
                .evaluate_term(term, expected.as_ref(), &mut evidence.searched_terms)
                .await
            {
                Ok(verdict) => verdict,
                Err(err) => {
                    tracing::warn!("Search for {:?} failed: {}", term, err);
                    return Err(ResolveError::new(
                        ResolveErrorCode::SearchFailed,
                        &normalized,
                        format!("Search failed while resolving \"{normalized}\": {err}"),
                    )
                    .with_details(ErrorDetails {
                        searched_terms: evidence.searched_terms,
                        cause: Some(err.to_string()),
                        ..ErrorDetails::default()
                    }));
                }
            };
            tracing::debug!("Term {:?} -> {:?}", term, verdict);

            if let Some(found) = evidence.record(term, verdict) {
                tracing::info!("Resolved {:?} to {} via term {:?}", normalized, found.uri, term);
                return Ok(ResolvedRef::from_summary(found));
            }
        }

        evidence.conclude(&normalized, expected.as_ref(), self.config.max_candidates)
    }

    /// Run one term to a verdict. The term is appended to `searched` once its
    /// narrow search has succeeded.
    async fn evaluate_term(
        &self,
        term: &str,
        expected: Option<&ExpectedTypes>,
        searched: &mut Vec<String>,
    ) -> std::result::Result<TermVerdict, BackendError> {
        let mut state = TermState::Searching;
        loop {
            state = match state {
                TermState::Searching => {
                    let results = self
                        .filtered_search(term, self.config.narrow_limit, expected)
                        .await?;
                    searched.push(term.to_string());
                    classify_narrow(term, results)
                }
                TermState::ExactUniquePending => {
                    let results = self
                        .filtered_search(term, self.config.revalidation_limit, expected)
                        .await?;
                    TermState::Settled(classify_exact_revalidation(term, &results))
                }
                TermState::BroadUniquePending => {
                    let results = self
                        .filtered_search(term, self.config.revalidation_limit, expected)
                        .await?;
                    TermState::Settled(classify_broad_revalidation(results))
                }
                TermState::Settled(verdict) => return Ok(verdict),
            };
        }
    }

    async fn filtered_search(
        &self,
        term: &str,
        max_results: usize,
        expected: Option<&ExpectedTypes>,
    ) -> std::result::Result<Vec<ObjectSummary>, BackendError> {
        let raw = self.backend.search(term, max_results).await?;
        let raw_count = raw.len();
        let filtered = filter_by_expected_types(raw, expected);
        tracing::debug!(
            "Search {:?} (max {}): {} hits, {} after type filter",
            term,
            max_results,
            raw_count,
            filtered.len()
        );
        Ok(filtered)
    }
}
