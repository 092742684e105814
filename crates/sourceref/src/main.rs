mod cli;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    dispatch(cli.command).await
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Route { reference, json } => cli::route::run(&reference, json),
        Commands::Terms { reference } => {
            cli::terms::run(&reference);
            Ok(())
        }
        Commands::Resolve {
            reference,
            catalog,
            json,
        } => cli::resolve::run(&reference, &catalog, json).await,
        Commands::Show { reference, catalog } => cli::show::run(&reference, &catalog).await,
    }
}
