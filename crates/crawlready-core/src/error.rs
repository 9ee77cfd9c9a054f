//! Error types and handling for crawlready-core operations.
//!
//! The error taxonomy is deliberately narrow: outbound network failures are
//! absorbed by the fetch gateway (see [`crate::fetcher`]) and never surface
//! here, so the variants below cover input validation, parsing, configuration
//! and the handful of infrastructure failures that genuinely abort a request.

use thiserror::Error;

/// The main error type for crawlready-core operations.
///
/// All public functions in crawlready-core return `Result<T, Error>`.
/// Note that per-site and per-check failures inside an analysis run are
/// *not* errors: they degrade into zero-score results by design.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed (config file access, mostly).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An HTTP client could not be constructed.
    ///
    /// Outbound request failures never produce this variant; they are
    /// converted into unreachable fetch outcomes at the gateway.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Content could not be parsed (robots rules, structured data).
    ///
    /// Only used when a parse failure is fatal to the caller; malformed
    /// blocks inside scoring are skipped and scored as absent instead.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A seed or candidate URL could not be parsed into an absolute URL.
    ///
    /// This is the only error a discovery run can surface: individual
    /// candidate failures degrade to unreachable records.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation exceeded its configured deadline.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for errors that are typically temporary (timeouts,
    /// connection failures, interrupted I/O) and `false` for permanent ones
    /// (invalid input, parse failures, bad configuration).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful for grouping errors in logs or metrics sinks.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
