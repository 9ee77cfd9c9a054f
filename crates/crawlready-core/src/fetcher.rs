//! HTTP fetch gateway with short-TTL caching and typed reachability.
//!
//! Every outbound call in the engine goes through [`Fetcher`]. Network
//! failures (timeout, DNS, connection refused) are never propagated as
//! errors: they are converted into [`FetchOutcome::Unreachable`], which
//! reports status code 0, so callers can score "unreachable" uniformly
//! with "explicitly errored".
//!
//! Successful (HTTP 200) GET responses are cached by exact URL for a short
//! TTL. HEAD probes and non-200 responses are never cached.

use crate::config::FetchConfig;
use crate::{Error, Result};
use reqwest::Client;
use reqwest::redirect::Policy;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// A response that actually came back from the target, whatever its status.
#[derive(Debug, Clone)]
pub struct SiteResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
    /// Response headers, lossily decoded to strings.
    pub headers: HashMap<String, String>,
}

/// Outcome of an outbound fetch.
///
/// `Unreachable` carries the failure reason so tests and details strings can
/// inspect why a target could not be scored.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The target answered (any status code).
    Reachable(SiteResponse),
    /// The target could not be reached at all.
    Unreachable {
        /// Why the request failed (timeout, DNS, refused connection, ...).
        reason: String,
    },
}

impl FetchOutcome {
    /// Status code for scoring purposes; 0 when unreachable.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Reachable(response) => response.status,
            Self::Unreachable { .. } => 0,
        }
    }

    /// True when the target answered with a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Reachable(r) if (200..300).contains(&r.status))
    }

    /// Body text, when the target answered successfully.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Reachable(r) if (200..300).contains(&r.status) => Some(&r.body),
            _ => None,
        }
    }
}

/// Outcome of a redirect-following fetch.
#[derive(Debug, Clone)]
pub struct RedirectedFetch {
    /// The terminal response (or unreachable record).
    pub outcome: FetchOutcome,
    /// URL the request terminated at.
    pub final_url: String,
    /// Whether any redirect was followed on the way.
    pub was_redirected: bool,
}

struct CacheEntry {
    inserted: Instant,
    response: SiteResponse,
}

/// HTTP client for all engine traffic.
///
/// Holds two `reqwest` clients: one that observes redirects without
/// following them (plain fetches and probes report the raw status) and one
/// that follows up to five redirects for discovery-style fetches.
pub struct Fetcher {
    client: Client,
    redirecting_client: Client,
    cache: Mutex<HashMap<String, CacheEntry>>,
    cache_ttl: Duration,
}

impl Fetcher {
    /// Creates a fetcher from fetch configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Self::build(config.timeout(), config.cache_ttl(), &config.user_agent)
    }

    /// Creates a fetcher with a custom timeout and TTL (primarily for tests).
    pub fn with_timeout(timeout: Duration, cache_ttl: Duration) -> Result<Self> {
        Self::build(
            timeout,
            cache_ttl,
            concat!("crawlready/", env!("CARGO_PKG_VERSION")),
        )
    }

    fn build(timeout: Duration, cache_ttl: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .redirect(Policy::none())
            .build()
            .map_err(Error::Network)?;

        let redirecting_client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .redirect(Policy::limited(5))
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            redirecting_client,
            cache: Mutex::new(HashMap::new()),
            cache_ttl,
        })
    }

    /// GET a URL, consulting and populating the response cache.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        if let Some(cached) = self.cached(url) {
            debug!(url, "cache hit");
            return FetchOutcome::Reachable(cached);
        }

        let outcome = match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let headers = collect_headers(response.headers());
                match response.text().await {
                    Ok(body) => FetchOutcome::Reachable(SiteResponse {
                        status,
                        body,
                        headers,
                    }),
                    Err(e) => FetchOutcome::Unreachable {
                        reason: format!("failed to read body: {e}"),
                    },
                }
            },
            Err(e) => FetchOutcome::Unreachable {
                reason: e.to_string(),
            },
        };

        if let FetchOutcome::Reachable(response) = &outcome {
            if response.status == 200 {
                self.store(url, response.clone());
            }
        }

        outcome
    }

    /// HEAD a URL and return its status code; 0 on network failure.
    ///
    /// Redirects are followed so a probe reports the terminal status.
    /// Probe results are never cached.
    pub async fn probe(&self, url: &str) -> u16 {
        match self.redirecting_client.head(url).send().await {
            Ok(response) => response.status().as_u16(),
            Err(e) => {
                debug!(url, error = %e, "probe failed");
                0
            },
        }
    }

    /// GET a URL and report how long the round trip took.
    pub async fn timed_fetch(&self, url: &str) -> (FetchOutcome, u64) {
        let start = Instant::now();
        let outcome = self.fetch(url).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        (outcome, elapsed_ms)
    }

    /// GET a URL following redirects, reporting the terminal URL.
    ///
    /// Responses fetched this way bypass the cache: the cache is keyed by
    /// requested URL and a redirect would alias entries.
    pub async fn fetch_following_redirects(&self, url: &str) -> RedirectedFetch {
        match self.redirecting_client.get(url).send().await {
            Ok(response) => {
                let final_url = response.url().to_string();
                let was_redirected = urls_differ(url, &final_url);
                let status = response.status().as_u16();
                let headers = collect_headers(response.headers());
                let outcome = match response.text().await {
                    Ok(body) => FetchOutcome::Reachable(SiteResponse {
                        status,
                        body,
                        headers,
                    }),
                    Err(e) => FetchOutcome::Unreachable {
                        reason: format!("failed to read body: {e}"),
                    },
                };
                RedirectedFetch {
                    outcome,
                    final_url,
                    was_redirected,
                }
            },
            Err(e) => RedirectedFetch {
                outcome: FetchOutcome::Unreachable {
                    reason: e.to_string(),
                },
                final_url: url.to_string(),
                was_redirected: false,
            },
        }
    }

    fn cached(&self, url: &str) -> Option<SiteResponse> {
        let cache = self.cache.lock().ok()?;
        let entry = cache.get(url)?;
        (entry.inserted.elapsed() < self.cache_ttl).then(|| entry.response.clone())
    }

    fn store(&self, url: &str, response: SiteResponse) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                url.to_string(),
                CacheEntry {
                    inserted: Instant::now(),
                    response,
                },
            );
        }
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Compare URLs ignoring a trailing-slash difference, which reqwest
/// normalizes on bare-origin requests.
fn urls_differ(requested: &str, terminal: &str) -> bool {
    let normalize = |u: &str| u.trim_end_matches('/').to_string();
    normalize(requested) != normalize(terminal)
}
