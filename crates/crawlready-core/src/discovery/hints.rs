//! Link hints harvested from a seed page's markup.
//!
//! Navigation and footer sections are where sites link their own satellite
//! properties (docs, blog, status page), so hrefs are harvested from those
//! regions plus `<link rel="alternate">`/`<link rel="help">` heads. The
//! harvest runs on raw
//! markup with regexes: it has to work even on pages too broken for a DOM
//! pass to be trustworthy.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// SAFETY: patterns are compile-time constants known to be valid.
#[allow(clippy::unwrap_used)]
static NAV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<nav\b.*?</nav>").unwrap());
#[allow(clippy::unwrap_used)]
static FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<footer\b.*?</footer>").unwrap());
#[allow(clippy::unwrap_used)]
static LINK_REL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link\b[^>]*rel=["'](?:alternate|help)["'][^>]*>"#).unwrap()
});
#[allow(clippy::unwrap_used)]
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href=["']([^"'#]+)["']"#).unwrap());

/// Token stems that mark a link as a satellite property worth probing.
///
/// Matched as prefixes so `docs`, `documentation` and `helpdesk` all
/// qualify.
const HINT_TOKEN_STEMS: &[&str] = &["doc", "help", "api", "support", "blog", "dashboard"];

/// Harvest same-domain link hints from a page.
///
/// Returns absolute URL strings in document order, deduplicated, restricted
/// to hosts under `main_domain` and to links whose subdomain or path carries
/// one of the satellite token stems. Nav and footer sections link plenty of
/// pages that are dead weight for discovery (privacy, careers, login); the
/// allow-list keeps those out of the probe pool.
#[must_use]
pub fn extract(html: &str, base: &Url, main_domain: &str) -> Vec<String> {
    let mut regions = String::new();
    for re in [&*NAV_RE, &*FOOTER_RE, &*LINK_REL_RE] {
        for m in re.find_iter(html) {
            regions.push_str(m.as_str());
            regions.push('\n');
        }
    }

    let mut hints = Vec::new();
    for capture in HREF_RE.captures_iter(&regions) {
        let raw = capture[1].trim();
        if raw.is_empty()
            || raw.starts_with("mailto:")
            || raw.starts_with("tel:")
            || raw.starts_with("javascript:")
        {
            continue;
        }

        let Ok(resolved) = base.join(raw) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        if !same_domain(&resolved, main_domain) {
            continue;
        }
        if !carries_hint_token(&resolved, main_domain) {
            continue;
        }

        let href = resolved.to_string();
        if !hints.contains(&href) {
            hints.push(href);
        }
    }

    hints
}

/// Whether a URL names a satellite property: a token stem must appear as a
/// subdomain label prefix or a path segment prefix.
fn carries_hint_token(url: &Url, main_domain: &str) -> bool {
    let in_subdomain = url.host_str().is_some_and(|host| {
        let host = host.strip_prefix("www.").unwrap_or(host);
        host.strip_suffix(main_domain)
            .and_then(|prefix| prefix.strip_suffix('.'))
            .is_some_and(|labels| {
                labels
                    .split('.')
                    .any(|label| HINT_TOKEN_STEMS.iter().any(|stem| label.starts_with(stem)))
            })
    });
    let in_path = url.path_segments().is_some_and(|mut segments| {
        segments.any(|segment| HINT_TOKEN_STEMS.iter().any(|stem| segment.starts_with(stem)))
    });
    in_subdomain || in_path
}

/// Whether a URL's host is the main domain or one of its subdomains.
fn same_domain(url: &Url, main_domain: &str) -> bool {
    url.host_str().is_some_and(|host| {
        let host = host.strip_prefix("www.").unwrap_or(host);
        host == main_domain || host.ends_with(&format!(".{main_domain}"))
    })
}
