//! crawlready CLI - AI crawler discoverability analysis.
//!
//! Entry point for the `crawlready` command-line interface. Command
//! implementations live in the `commands` module.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    match cli.command {
        Commands::Analyze { ref url, no_context } => {
            commands::analyze::execute(url, no_context, cli.format).await
        },
        Commands::Discover { ref url } => commands::discover::execute(url, cli.format).await,
        Commands::Crawl {
            ref url,
            max_sites,
            no_subdomains,
            no_paths,
            ref custom_urls,
        } => {
            commands::crawl::execute(
                url,
                max_sites,
                no_subdomains,
                no_paths,
                custom_urls.clone(),
                cli.format,
            )
            .await
        },
    }
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    // RUST_LOG wins; --verbose sets the fallback level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
