//! Related-site discovery.
//!
//! From one seed URL the engine finds the satellite properties worth
//! analyzing alongside it: fetch the seed page, harvest link hints from its
//! navigation and footer, add pattern guesses for the detected site kind,
//! probe everything concurrently, and collapse records that land on the
//! same terminal URL.
//!
//! Only an unparseable seed is an error; a seed that is reachable but
//! linkless still yields a (small) result.

pub mod candidates;
pub mod hints;
pub mod probe;

use crate::classify;
use crate::fetcher::Fetcher;
use crate::types::{DiscoveryResult, OriginKind};
use crate::util;
use crate::Result;
use candidates::Candidate;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Upper bound on probes per discovery run.
const MAX_PROBES: usize = 24;

/// Which candidate families a discovery run may generate.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryOptions {
    /// Admit subdomain hints and subdomain pattern guesses.
    pub include_subdomains: bool,
    /// Admit path hints and path pattern guesses.
    pub include_paths: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            include_subdomains: true,
            include_paths: true,
        }
    }
}

/// Runs the discovery pipeline.
pub struct DiscoveryEngine {
    fetcher: Arc<Fetcher>,
}

impl DiscoveryEngine {
    /// Creates an engine over a shared fetcher.
    #[must_use]
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Discover sites related to a seed URL with both guess families enabled.
    pub async fn discover(&self, seed: &str) -> Result<DiscoveryResult> {
        self.discover_with(seed, DiscoveryOptions::default()).await
    }

    /// Discover sites related to a seed URL.
    pub async fn discover_with(
        &self,
        seed: &str,
        options: DiscoveryOptions,
    ) -> Result<DiscoveryResult> {
        let seed_url = util::normalize_input_url(seed)?;
        let main_domain = util::bare_domain(&seed_url);

        let seed_fetch = self
            .fetcher
            .fetch_following_redirects(seed_url.as_str())
            .await;
        let body = seed_fetch.outcome.body();
        let site_kind = classify::detect_site_kind(body);

        let mut pool: Vec<Candidate> = vec![Candidate {
            url: seed_url.to_string(),
            origin_kind: OriginKind::Main,
        }];
        if let Some(body) = body {
            for hint in hints::extract(body, &seed_url, &main_domain) {
                let candidate = hint_candidate(&hint, &seed_url);
                if admits(options, candidate.origin_kind) {
                    push_unique(&mut pool, candidate);
                }
            }
        }
        for candidate in candidates::generate(&seed_url, &main_domain, site_kind, options) {
            push_unique(&mut pool, candidate);
        }
        pool.truncate(MAX_PROBES);

        info!(
            seed = %seed_url,
            kind = ?site_kind,
            candidates = pool.len(),
            "probing discovery candidates"
        );

        let probed = probe::probe_all(&self.fetcher, &pool).await;
        let discovered_sites = probe::dedup_by_final_url(probed);
        let total_found = discovered_sites.len();
        let analysis_ready = discovered_sites
            .iter()
            .filter(|site| site.accessible)
            .cloned()
            .collect();

        Ok(DiscoveryResult {
            main_domain,
            site_kind,
            discovered_sites,
            total_found,
            analysis_ready,
        })
    }
}

const fn admits(options: DiscoveryOptions, origin_kind: OriginKind) -> bool {
    match origin_kind {
        OriginKind::Main => true,
        OriginKind::Subdomain => options.include_subdomains,
        OriginKind::Path => options.include_paths,
    }
}

fn hint_candidate(hint: &str, seed_url: &Url) -> Candidate {
    let hint_host = Url::parse(hint).ok().and_then(|parsed| {
        parsed
            .host_str()
            .map(|h| h.strip_prefix("www.").unwrap_or(h).to_string())
    });
    let origin_kind = match hint_host {
        Some(hint_host) => {
            let seed_host = seed_url.host_str().unwrap_or_default();
            let seed_host = seed_host.strip_prefix("www.").unwrap_or(seed_host);
            if hint_host == seed_host {
                OriginKind::Path
            } else {
                OriginKind::Subdomain
            }
        },
        None => OriginKind::Path,
    };

    Candidate {
        url: hint.to_string(),
        origin_kind,
    }
}

fn push_unique(pool: &mut Vec<Candidate>, candidate: Candidate) {
    let key = candidate.url.trim_end_matches('/').to_lowercase();
    if !pool
        .iter()
        .any(|existing| existing.url.trim_end_matches('/').to_lowercase() == key)
    {
        pool.push(candidate);
    }
}
