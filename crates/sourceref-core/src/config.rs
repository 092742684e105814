use serde::{Deserialize, Serialize};

use crate::search::DEFAULT_MAX_TERMS;

/// Search caps and limits used by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Result cap for the first search of every term.
    #[serde(default = "default_narrow_limit")]
    pub narrow_limit: usize,
    /// Result cap used to confirm an apparently unique hit.
    #[serde(default = "default_revalidation_limit")]
    pub revalidation_limit: usize,
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,
    /// Candidate summaries reported by an ambiguity error.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

const fn default_narrow_limit() -> usize {
    12
}

const fn default_revalidation_limit() -> usize {
    100
}

const fn default_max_terms() -> usize {
    DEFAULT_MAX_TERMS
}

const fn default_max_candidates() -> usize {
    8
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            narrow_limit: default_narrow_limit(),
            revalidation_limit: default_revalidation_limit(),
            max_terms: default_max_terms(),
            max_candidates: default_max_candidates(),
        }
    }
}

impl ResolverConfig {
    /// Defaults overridden by `SOURCEREF_*` environment variables. Values that
    /// do not parse as a positive integer are ignored.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`ResolverConfig::from_env`], reading variables through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let limit = |name: &str, default: usize| {
            var(name)
                .and_then(|value| parse_limit(name, &value))
                .unwrap_or(default)
        };
        Self {
            narrow_limit: limit("SOURCEREF_NARROW_LIMIT", defaults.narrow_limit),
            revalidation_limit: limit("SOURCEREF_REVALIDATION_LIMIT", defaults.revalidation_limit),
            max_terms: limit("SOURCEREF_MAX_TERMS", defaults.max_terms),
            max_candidates: limit("SOURCEREF_MAX_CANDIDATES", defaults.max_candidates),
        }
    }
}

fn parse_limit(name: &str, value: &str) -> Option<usize> {
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Some(limit),
        _ => {
            tracing::warn!("Ignoring {}={:?}: expected a positive integer", name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.narrow_limit, 12);
        assert_eq!(config.revalidation_limit, 100);
        assert_eq!(config.max_terms, 6);
        assert_eq!(config.max_candidates, 8);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"narrow_limit": 5}"#).unwrap();
        assert_eq!(config.narrow_limit, 5);
        assert_eq!(config.revalidation_limit, 100);
    }

    #[test]
    fn test_env_overrides() {
        let config = ResolverConfig::from_vars(vars(&[
            ("SOURCEREF_NARROW_LIMIT", "5"),
            ("SOURCEREF_MAX_CANDIDATES", " 3 "),
        ]));
        assert_eq!(config.narrow_limit, 5);
        assert_eq!(config.max_candidates, 3);
        assert_eq!(config.revalidation_limit, 100);
        assert_eq!(config.max_terms, 6);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let config = ResolverConfig::from_vars(vars(&[
            ("SOURCEREF_NARROW_LIMIT", "0"),
            ("SOURCEREF_REVALIDATION_LIMIT", "abc"),
            ("SOURCEREF_MAX_TERMS", "-2"),
        ]));
        assert_eq!(config, ResolverConfig::default());
    }
}
