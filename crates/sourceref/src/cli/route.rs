use anyhow::Result;
use sourceref_core::route_ref;

pub fn run(reference: &str, json: bool) -> Result<()> {
    let route = route_ref(reference);

    if json {
        println!("{}", serde_json::to_string_pretty(&route)?);
        return Ok(());
    }

    println!("kind:     {}", route.kind);
    println!("ref:      {}", route.normalized_ref);
    println!("language: {}", route.display_language);
    Ok(())
}
