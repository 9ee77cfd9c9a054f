//! Core engine for AI-crawler discoverability analysis.
//!
//! `crawlready-core` measures how well a site can be found, crawled, and
//! quoted by AI assistants. It fetches a page and its auxiliary files
//! (robots.txt, llms.txt, sitemap, feeds), extracts structural metrics from
//! the markup, runs a fixed battery of scoring checks grouped into four
//! categories, and aggregates everything into a weighted overall score with
//! concrete recommendations.
//!
//! On top of single-site scoring sit two higher layers: a discovery engine
//! that finds a site's satellite properties (docs, blog, API portal) from
//! link hints and pattern guesses, and an orchestrator that analyzes a whole
//! site family in concurrent batches with context-aware weighting per page
//! type.
//!
//! ## Quick start
//!
//! ```no_run
//! use crawlready_core::analyze_site;
//!
//! # async fn example() -> crawlready_core::Result<()> {
//! let report = analyze_site("https://example.com").await?;
//! println!("{}: {}", report.url, report.overall_score);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod context;
pub mod discovery;
mod error;
pub mod fetcher;
pub mod metrics;
pub mod orchestrator;
pub mod robots;
pub mod scoring;
pub mod types;
pub(crate) mod util;

pub use config::{AnalysisConfig, Config, FetchConfig};
pub use context::{adjust, ContextAdjustment};
pub use discovery::{DiscoveryEngine, DiscoveryOptions};
pub use error::{Error, Result};
pub use fetcher::{FetchOutcome, Fetcher, SiteResponse};
pub use metrics::ContentMetrics;
pub use orchestrator::Orchestrator;
pub use robots::{RobotsRules, CRITICAL_AGENTS};
pub use scoring::{ScoreCategory, ScoringEngine};
pub use types::{
    AnalysisResponse, DiscoveredSite, DiscoveryResult, MultiSiteAnalysisResponse,
    MultiSiteRequest, SiteAnalysisResult, SiteCategory, SiteKind,
};

use std::sync::Arc;

/// Analyze a single site with default configuration.
///
/// # Errors
///
/// Fails only on an unparseable URL or when the HTTP client cannot be
/// constructed; unreachable sites produce a low-scoring response.
pub async fn analyze_site(url: &str) -> Result<AnalysisResponse> {
    let fetcher = Arc::new(Fetcher::new(&FetchConfig::default())?);
    ScoringEngine::new(fetcher).analyze(url).await
}

/// Discover the satellite sites of a seed URL with default configuration.
///
/// # Errors
///
/// Fails only on an unparseable seed URL or when the HTTP client cannot be
/// constructed.
pub async fn discover_sites(seed: &str) -> Result<DiscoveryResult> {
    let fetcher = Arc::new(Fetcher::new(&FetchConfig::default())?);
    DiscoveryEngine::new(fetcher).discover(seed).await
}

/// Run a full multi-site analysis with default configuration.
///
/// # Errors
///
/// Fails only on an unparseable input URL or when the HTTP client cannot be
/// constructed; per-site failures degrade to zero-score entries.
pub async fn analyze_multiple_sites(
    request: &MultiSiteRequest,
) -> Result<MultiSiteAnalysisResponse> {
    let orchestrator = Orchestrator::new(&Config::default())?;
    orchestrator.run(request).await
}
