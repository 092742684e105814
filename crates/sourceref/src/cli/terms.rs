use sourceref_core::reference::{base_name, normalize_ref, strip_diff_prefix};
use sourceref_core::{derive_search_terms, infer_expected_types, ResolverConfig};

pub fn run(reference: &str) {
    let normalized = normalize_ref(reference);
    let config = ResolverConfig::from_env();
    let terms = derive_search_terms(&normalized, config.max_terms);
    let cleaned = strip_diff_prefix(&normalized);

    if terms.is_empty() {
        eprintln!("No search terms for {reference:?}");
        return;
    }

    for (i, term) in terms.iter().enumerate() {
        println!("{:>2}. {term}", i + 1);
    }

    match infer_expected_types(base_name(&cleaned)) {
        Some(types) => println!("types: {}", types.to_vec().join(", ")),
        None => println!("types: any"),
    }
}
