//! Site discovery command.

use crate::cli::OutputFormat;
use crate::output;
use anyhow::Result;
use crawlready_core::{Config, DiscoveryEngine, Fetcher};
use std::sync::Arc;

/// Execute the discover command.
pub async fn execute(url: &str, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let fetcher = Arc::new(Fetcher::new(&config.fetch)?);
    let engine = DiscoveryEngine::new(fetcher);

    let result = engine.discover(url).await?;

    match format {
        OutputFormat::Text => output::print_discovery(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
