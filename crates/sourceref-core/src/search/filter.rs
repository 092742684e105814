use super::object_type::ExpectedTypes;
use crate::backend::ObjectSummary;

/// Keep results whose type satisfies the expected set. Entries without a type
/// are dropped once a constraint exists; no constraint keeps everything.
pub fn filter_by_expected_types(
    results: Vec<ObjectSummary>,
    expected: Option<&ExpectedTypes>,
) -> Vec<ObjectSummary> {
    let Some(expected) = expected else {
        return results;
    };

    results
        .into_iter()
        .filter(|entry| {
            entry
                .object_type
                .as_deref()
                .is_some_and(|object_type| expected.accepts(object_type))
        })
        .collect()
}

/// Entries whose name equals the term, ignoring case and surrounding space.
pub fn exact_name_matches(results: &[ObjectSummary], term: &str) -> Vec<ObjectSummary> {
    let term = term.trim().to_uppercase();
    results
        .iter()
        .filter(|entry| entry.name.trim().to_uppercase() == term)
        .cloned()
        .collect()
}
