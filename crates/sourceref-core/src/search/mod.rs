mod filter;
mod object_type;
mod terms;

pub use filter::{exact_name_matches, filter_by_expected_types};
pub use object_type::{infer_expected_types, ExpectedTypes};
pub use terms::{derive_search_terms, DEFAULT_MAX_TERMS};
