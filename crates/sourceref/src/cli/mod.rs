pub mod resolve;
pub mod route;
pub mod show;
pub mod terms;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sourceref_core::{CatalogBackend, CatalogOptions};

#[derive(Parser)]
#[command(
    name = "srcref",
    about = "Resolve loose source references to repository objects",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a reference as repository object or workspace path
    Route {
        /// Reference as typed or pasted
        reference: String,
        /// Print the route as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the search terms and expected object types for a reference
    Terms {
        /// Reference as typed or pasted
        reference: String,
    },
    /// Resolve a reference against an object catalog
    Resolve {
        /// Reference as typed or pasted
        reference: String,
        /// JSON catalog file ({"objects": [...]})
        #[arg(short, long)]
        catalog: PathBuf,
        /// Print the result or error as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a reference and print its source
    Show {
        /// Reference as typed or pasted
        reference: String,
        /// JSON catalog file ({"objects": [...]})
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

pub fn load_catalog(path: &Path) -> Result<CatalogBackend> {
    let backend = CatalogBackend::load(path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    Ok(backend.with_options(CatalogOptions::from_env()))
}
