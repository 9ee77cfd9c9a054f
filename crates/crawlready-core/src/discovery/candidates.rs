//! Pattern-based candidate generation.
//!
//! Beyond what the seed page links to, sites keep satellite properties at
//! predictable locations. Each site kind contributes its own token list on
//! top of a common core; every token yields a subdomain guess and a path
//! guess. Subdomain guesses are skipped for IP and localhost seeds, where
//! they cannot resolve.

use crate::discovery::DiscoveryOptions;
use crate::types::{OriginKind, SiteKind};
use url::Url;

/// Tokens tried for every site regardless of kind.
const COMMON_TOKENS: &[&str] = &["docs", "blog", "api", "support", "help"];

/// Extra tokens per detected site kind.
const KIND_TOKENS: &[(SiteKind, &[&str])] = &[
    (
        SiteKind::DeveloperPlatform,
        &["developers", "reference", "status", "changelog"],
    ),
    (SiteKind::Ecommerce, &["shop", "store", "community"]),
    (SiteKind::Saas, &["app", "status", "community"]),
    (SiteKind::ContentSite, &["news", "newsletter", "archive"]),
    (SiteKind::Corporate, &["careers", "press", "investors"]),
];

/// A URL to probe, tagged with how it was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute URL to probe.
    pub url: String,
    /// How the candidate relates to the seed domain.
    pub origin_kind: OriginKind,
}

/// Generate pattern candidates for a seed.
///
/// The seed's scheme is carried over so local/test deployments stay on
/// plain HTTP. `options` can turn either guess family off entirely.
#[must_use]
pub fn generate(
    seed: &Url,
    main_domain: &str,
    site_kind: SiteKind,
    options: DiscoveryOptions,
) -> Vec<Candidate> {
    let scheme = seed.scheme();
    let subdomains_possible = options.include_subdomains
        && seed
            .host_str()
            .is_some_and(|host| host != "localhost" && host.parse::<std::net::IpAddr>().is_err());
    let port = seed
        .port()
        .map(|p| format!(":{p}"))
        .unwrap_or_default();

    let kind_tokens = KIND_TOKENS
        .iter()
        .find(|(kind, _)| *kind == site_kind)
        .map_or(&[] as &[&str], |(_, tokens)| tokens);

    let mut candidates = Vec::new();
    for token in COMMON_TOKENS.iter().chain(kind_tokens) {
        if subdomains_possible {
            candidates.push(Candidate {
                url: format!("{scheme}://{token}.{main_domain}{port}/"),
                origin_kind: OriginKind::Subdomain,
            });
        }
        if options.include_paths {
            let host = seed.host_str().unwrap_or(main_domain);
            candidates.push(Candidate {
                url: format!("{scheme}://{host}{port}/{token}"),
                origin_kind: OriginKind::Path,
            });
        }
    }

    candidates
}
