//! Single-site analysis command.

use crate::cli::OutputFormat;
use crate::output;
use anyhow::Result;
use crawlready_core::{classify, context, Config, Fetcher, ScoringEngine};
use std::sync::Arc;

/// Execute the analyze command.
pub async fn execute(url: &str, no_context: bool, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let fetcher = Arc::new(Fetcher::new(&config.fetch)?);
    let engine = ScoringEngine::new(fetcher);

    let mut report = engine.analyze(url).await?;

    if !no_context {
        let page_type = classify::classify_url_str(&report.url);
        let adjustment = context::adjust(&report, page_type);
        report.page_type = Some(page_type);
        if !adjustment.adjustments.is_empty() {
            report.scoring_adjustments = Some(adjustment.adjustments);
        }
    }

    match format {
        OutputFormat::Text => output::print_analysis(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
