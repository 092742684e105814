use crate::reference::{base_name, strip_diff_prefix, OBJECT_FILE_SUFFIX};

/// Default number of terms tried per reference.
pub const DEFAULT_MAX_TERMS: usize = 6;

fn push_term(terms: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return;
    }
    if !terms.iter().any(|term| term == candidate) {
        terms.push(candidate.to_string());
    }
    let upper = candidate.to_uppercase();
    if upper != candidate && !terms.contains(&upper) {
        terms.push(upper);
    }
}

fn strip_last_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => &name[..idx],
        _ => name,
    }
}

/// Expand a normalized reference into the ordered list of search terms,
/// most literal first.
pub fn derive_search_terms(normalized_ref: &str, max_terms: usize) -> Vec<String> {
    let mut terms = Vec::new();
    let cleaned = strip_diff_prefix(normalized_ref);
    let name = base_name(&cleaned);

    push_term(&mut terms, normalized_ref);
    push_term(&mut terms, &cleaned);
    push_term(&mut terms, name);
    push_term(&mut terms, strip_last_extension(name));

    if name.to_lowercase().ends_with(OBJECT_FILE_SUFFIX) {
        let parts: Vec<&str> = name.split('.').filter(|part| !part.is_empty()).collect();
        if let Some(first) = parts.first() {
            push_term(&mut terms, first);
        }
        if parts.len() > 1 {
            push_term(&mut terms, &format!("{}.{}", parts[0], parts[1]));
        }
    }

    terms.truncate(max_terms);
    terms
}
