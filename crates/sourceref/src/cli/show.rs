use std::path::Path;

use anyhow::Result;
use sourceref_core::{Opened, Outcome, ResolverConfig, SourceWorkbench};

use super::load_catalog;

pub async fn run(reference: &str, catalog: &Path) -> Result<()> {
    let backend = load_catalog(catalog)?;
    let workbench = SourceWorkbench::new(backend).with_config(ResolverConfig::from_env());

    match workbench.open(reference).await? {
        Outcome::Current(Opened::Object { resolved, document }) => {
            eprintln!(
                "{} ({}){}",
                resolved.display_name,
                document.object_uri,
                document
                    .etag
                    .map(|etag| format!(" etag {etag}"))
                    .unwrap_or_default()
            );
            print!("{}", document.source);
            if !document.source.ends_with('\n') {
                println!();
            }
        }
        Outcome::Current(Opened::Workspace {
            path,
            display_name,
            language,
        }) => {
            println!("workspace file {display_name} ({language}): {path}");
        }
        Outcome::Superseded => {}
    }
    Ok(())
}
