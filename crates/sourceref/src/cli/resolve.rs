use std::path::Path;

use anyhow::{bail, Result};
use sourceref_core::{Resolver, ResolverConfig};

use super::load_catalog;

pub async fn run(reference: &str, catalog: &Path, json: bool) -> Result<()> {
    let backend = load_catalog(catalog)?;
    let resolver = Resolver::new(&backend).with_config(ResolverConfig::from_env());

    match resolver.resolve(reference).await {
        Ok(resolved) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                println!("{} {}", resolved.object_uri, resolved.display_name);
            }
            Ok(())
        }
        Err(err) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&err)?);
            } else {
                for candidate in err.candidates() {
                    eprintln!("  {candidate}");
                }
            }
            bail!("{} ({})", err, err.code)
        }
    }
}
