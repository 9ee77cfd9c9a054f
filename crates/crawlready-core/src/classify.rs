//! Shared page-category and site-kind classification.
//!
//! Discovery and the context-aware weight adjustor both need to map a URL to
//! a functional category. A single classifier serves both so the two
//! subsystems can never disagree on token semantics.
//!
//! Classification inspects only the URL (subdomain labels and path
//! segments), never page content. Token families are checked in a fixed
//! order: api tokens before the broader docs tokens, which come before
//! blog/shop/support tokens.

use crate::types::{SiteCategory, SiteKind};
use url::Url;

/// Token families, in resolution order.
const CATEGORY_TOKENS: &[(SiteCategory, &[&str])] = &[
    (
        SiteCategory::Api,
        &[
            "api", "apis", "developer", "developers", "graphql", "rest", "openapi", "swagger",
        ],
    ),
    (
        SiteCategory::Docs,
        &[
            "docs",
            "documentation",
            "doc",
            "help",
            "manual",
            "guide",
            "guides",
            "learn",
            "reference",
            "wiki",
            "kb",
            "knowledge",
            "tutorial",
            "tutorials",
        ],
    ),
    (
        SiteCategory::Blog,
        &[
            "blog", "news", "article", "articles", "changelog", "updates", "posts", "press",
        ],
    ),
    (
        SiteCategory::Shop,
        &[
            "shop",
            "store",
            "checkout",
            "cart",
            "product",
            "products",
            "pricing",
            "buy",
            "marketplace",
        ],
    ),
    (
        SiteCategory::Support,
        &[
            "support", "contact", "faq", "faqs", "community", "status", "feedback", "helpdesk",
        ],
    ),
];

/// Root-level slugs that still count as the homepage.
const HOMEPAGE_SLUGS: &[&str] = &["about", "about-us", "home", "index", "index.html"];

/// Content keyword groups for coarse site-kind detection, in tie-break order.
const KIND_KEYWORDS: &[(SiteKind, &[&str])] = &[
    (
        SiteKind::DeveloperPlatform,
        &["api reference", "sdk", "developer", "documentation", "docs"],
    ),
    (
        SiteKind::Ecommerce,
        &["add to cart", "checkout", "shop", "store", "free shipping"],
    ),
    (
        SiteKind::Saas,
        &["pricing", "sign up", "free trial", "dashboard", "log in"],
    ),
    (
        SiteKind::ContentSite,
        &["blog", "read more", "subscribe", "newsletter", "latest posts"],
    ),
    (
        SiteKind::Corporate,
        &["about us", "our team", "careers", "our company", "contact us"],
    ),
];

/// Classify a URL into a functional page category.
///
/// Checks subdomain labels and path segments against the ordered token
/// families; the empty path or a root-level about/home/index slug maps to
/// [`SiteCategory::Homepage`]; anything unmatched is
/// [`SiteCategory::Unknown`].
#[must_use]
pub fn classify_url(url: &Url) -> SiteCategory {
    let subdomain_labels = subdomain_labels(url);
    let path_segments: Vec<String> = url
        .path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default();

    for (category, tokens) in CATEGORY_TOKENS {
        let hit = tokens.iter().any(|token| {
            subdomain_labels.iter().any(|label| label == token)
                || path_segments.iter().any(|segment| segment == token)
        });
        if hit {
            return *category;
        }
    }

    if path_segments.is_empty() {
        return SiteCategory::Homepage;
    }
    if path_segments.len() == 1 && HOMEPAGE_SLUGS.contains(&path_segments[0].as_str()) {
        return SiteCategory::Homepage;
    }

    SiteCategory::Unknown
}

/// Classify a URL string; parse failures land in `Unknown`.
#[must_use]
pub fn classify_url_str(url: &str) -> SiteCategory {
    Url::parse(url).map_or(SiteCategory::Unknown, |parsed| classify_url(&parsed))
}

/// Infer the coarse kind of a site from its homepage markup.
///
/// Scores each kind by keyword occurrences in the lowercased body and picks
/// the highest; ties resolve in declaration order. `None` content (the seed
/// fetch failed) or no keyword hits yield [`SiteKind::Unknown`].
#[must_use]
pub fn detect_site_kind(body: Option<&str>) -> SiteKind {
    let Some(body) = body else {
        return SiteKind::Unknown;
    };
    let haystack = body.to_lowercase();

    let mut best = (SiteKind::Unknown, 0_usize);
    for (kind, keywords) in KIND_KEYWORDS {
        let hits = keywords
            .iter()
            .filter(|keyword| haystack.contains(*keyword))
            .count();
        if hits > best.1 {
            best = (*kind, hits);
        }
    }

    best.0
}

/// Subdomain labels of a host: everything left of the registrable domain.
///
/// `docs.example.com` yields `["docs"]`; bare domains, IPs and localhost
/// yield nothing. `www` is not a meaningful subdomain and is dropped.
fn subdomain_labels(url: &Url) -> Vec<String> {
    let Some(host) = url.host_str() else {
        return Vec::new();
    };
    if host.parse::<std::net::IpAddr>().is_ok() {
        return Vec::new();
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return Vec::new();
    }

    labels[..labels.len() - 2]
        .iter()
        .filter(|label| **label != "www")
        .map(|label| label.to_lowercase())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn classify(url: &str) -> SiteCategory {
        classify_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn root_url_is_homepage() {
        assert_eq!(classify("https://example.com"), SiteCategory::Homepage);
        assert_eq!(classify("https://example.com/"), SiteCategory::Homepage);
        assert_eq!(classify("https://www.example.com/"), SiteCategory::Homepage);
    }

    #[test]
    fn root_level_slugs_are_homepage() {
        assert_eq!(classify("https://example.com/about"), SiteCategory::Homepage);
        assert_eq!(classify("https://example.com/home"), SiteCategory::Homepage);
        assert_eq!(classify("https://example.com/index"), SiteCategory::Homepage);
    }

    #[test]
    fn docs_subdomain_and_path_classify_as_docs() {
        assert_eq!(classify("https://docs.example.com/"), SiteCategory::Docs);
        assert_eq!(classify("https://example.com/docs/intro"), SiteCategory::Docs);
        assert_eq!(classify("https://example.com/help"), SiteCategory::Docs);
    }

    #[test]
    fn api_tokens_win_over_docs_tokens() {
        assert_eq!(classify("https://api.example.com/docs"), SiteCategory::Api);
        assert_eq!(
            classify("https://example.com/developers/guide"),
            SiteCategory::Api
        );
    }

    #[test]
    fn blog_shop_support_classify() {
        assert_eq!(classify("https://example.com/blog/post-1"), SiteCategory::Blog);
        assert_eq!(classify("https://shop.example.com/"), SiteCategory::Shop);
        assert_eq!(classify("https://example.com/pricing"), SiteCategory::Shop);
        assert_eq!(classify("https://example.com/support"), SiteCategory::Support);
        assert_eq!(classify("https://status.example.com/"), SiteCategory::Support);
    }

    #[test]
    fn unmatched_paths_are_unknown() {
        assert_eq!(
            classify("https://example.com/random/page"),
            SiteCategory::Unknown
        );
    }

    #[test]
    fn ip_hosts_have_no_subdomain_signal() {
        assert_eq!(classify("http://127.0.0.1:8080/"), SiteCategory::Homepage);
        assert_eq!(classify("http://127.0.0.1:8080/docs"), SiteCategory::Docs);
    }

    #[test]
    fn classify_str_tolerates_bad_input() {
        assert_eq!(classify_url_str("not a url"), SiteCategory::Unknown);
    }

    #[test]
    fn token_matching_requires_whole_segments() {
        // "apical" contains "api" but is not an api segment.
        assert_eq!(
            classify("https://example.com/apical/page"),
            SiteCategory::Unknown
        );
    }

    #[test]
    fn site_kind_from_developer_content() {
        let body = "<html>Read our documentation and API reference. Get the SDK.</html>";
        assert_eq!(detect_site_kind(Some(body)), SiteKind::DeveloperPlatform);
    }

    #[test]
    fn site_kind_from_ecommerce_content() {
        let body = "<html>Add to cart. Checkout now. Free shipping on orders.</html>";
        assert_eq!(detect_site_kind(Some(body)), SiteKind::Ecommerce);
    }

    #[test]
    fn site_kind_unknown_without_content() {
        assert_eq!(detect_site_kind(None), SiteKind::Unknown);
        assert_eq!(detect_site_kind(Some("<html>plain page</html>")), SiteKind::Unknown);
    }
}
