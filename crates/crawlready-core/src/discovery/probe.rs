//! Candidate probing and deduplication.

use super::candidates::Candidate;
use crate::classify;
use crate::fetcher::Fetcher;
use crate::types::DiscoveredSite;
use futures::future::join_all;
use tracing::debug;

/// Probe every candidate concurrently, preserving candidate order.
///
/// Each probe follows redirects so the record carries the terminal URL;
/// the category is classified from that terminal URL, not the guess.
pub async fn probe_all(fetcher: &Fetcher, candidates: &[Candidate]) -> Vec<DiscoveredSite> {
    let probes = candidates.iter().map(|candidate| async move {
        let result = fetcher.fetch_following_redirects(&candidate.url).await;
        let accessible = result.outcome.is_success();
        debug!(
            url = %candidate.url,
            status = result.outcome.status(),
            accessible,
            "probed candidate"
        );
        DiscoveredSite {
            url: candidate.url.clone(),
            origin_kind: candidate.origin_kind,
            category: classify::classify_url_str(&result.final_url),
            discovered: true,
            accessible,
            is_redirect: result.was_redirected,
            final_url: result.final_url,
        }
    });

    join_all(probes).await
}

/// Collapse records that landed on the same terminal URL.
///
/// The canonical record (the one that was not redirected) wins over any
/// redirected alias; among equals, the first occurrence wins. Order is
/// otherwise preserved.
#[must_use]
pub fn dedup_by_final_url(sites: Vec<DiscoveredSite>) -> Vec<DiscoveredSite> {
    let mut kept: Vec<DiscoveredSite> = Vec::with_capacity(sites.len());

    for site in sites {
        let key = normalize(&site.final_url);
        match kept
            .iter()
            .position(|existing| normalize(&existing.final_url) == key)
        {
            None => kept.push(site),
            Some(index) => {
                if kept[index].is_redirect && !site.is_redirect {
                    kept[index] = site;
                }
            },
        }
    }

    kept
}

fn normalize(url: &str) -> String {
    url.trim_end_matches('/').to_lowercase()
}
