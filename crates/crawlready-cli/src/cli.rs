//! Command-line interface definition.
//!
//! Three subcommands mirror the engine's three entry points: `analyze` for a
//! single site, `discover` to list a site's satellite properties, and
//! `crawl` for a full multi-site run. Every command supports `--format json`
//! for scripting.

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI.
#[derive(Parser, Debug)]
#[command(name = "crawlready")]
#[command(version)]
#[command(about = "Analyze how discoverable a site is for AI crawlers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// How results are rendered.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable colored output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a single site
    Analyze {
        /// URL to analyze (scheme optional, https assumed)
        url: String,

        /// Skip context-aware score adjustment
        #[arg(long)]
        no_context: bool,
    },

    /// Discover the satellite sites of a domain
    Discover {
        /// Seed URL to discover from
        url: String,
    },

    /// Discover and analyze a whole site family
    Crawl {
        /// Seed URL for discovery
        url: String,

        /// Maximum number of sites to analyze
        #[arg(long, default_value_t = 10)]
        max_sites: usize,

        /// Do not guess subdomain candidates during discovery
        #[arg(long)]
        no_subdomains: bool,

        /// Do not guess path candidates during discovery
        #[arg(long)]
        no_paths: bool,

        /// Analyze these URLs instead of running discovery
        #[arg(long = "url", value_name = "URL")]
        custom_urls: Vec<String>,
    },
}
