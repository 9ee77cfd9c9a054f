//! Multi-site crawl-and-analyze command.

use crate::cli::OutputFormat;
use crate::output;
use anyhow::Result;
use crawlready_core::{Config, MultiSiteRequest, Orchestrator};

/// Execute the crawl command.
pub async fn execute(
    url: &str,
    max_sites: usize,
    no_subdomains: bool,
    no_paths: bool,
    custom_urls: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let config = Config::load()?;
    let orchestrator = Orchestrator::new(&config)?;

    let request = MultiSiteRequest {
        input_url: url.to_string(),
        discovery_enabled: custom_urls.is_empty(),
        custom_urls,
        include_subdomains: !no_subdomains,
        include_paths: !no_paths,
        max_sites,
    };

    let response = orchestrator.run(&request).await?;

    match format {
        OutputFormat::Text => output::print_multi_site(&response),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}
