//! Small URL helpers shared by the engine, discovery, and the orchestrator.

use crate::{Error, Result};
use url::Url;

/// Parse user input into an absolute URL, defaulting to the `https` scheme.
///
/// Accepts `example.com`, `https://example.com/docs`, and anything in
/// between; rejects input without a host.
pub fn normalize_input_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("empty URL".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;
    if url.host_str().is_none() {
        return Err(Error::InvalidUrl(format!("{trimmed}: no host")));
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "{trimmed}: unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(url)
}

/// The bare domain of a URL: its host with any leading `www.` removed.
#[must_use]
pub fn bare_domain(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
