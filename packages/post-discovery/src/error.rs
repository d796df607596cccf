//! Typed errors for original post discovery.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of every failure the resolution engine can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The syndicated copy itself could not be fetched
    Fetch,

    /// A candidate or fallback syndication target could not be fetched
    VerificationFetch,

    /// The candidate was not served as HTML
    WrongContentType,

    /// The candidate does not link back to the syndicated copy
    NoMatch,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Fetch => "fetch",
            ErrorKind::VerificationFetch => "verification_fetch",
            ErrorKind::WrongContentType => "wrong_content_type",
            ErrorKind::NoMatch => "no_match",
        };
        f.write_str(s)
    }
}

/// Errors surfaced by the resolution orchestrator.
///
/// Only an unreachable syndicated copy is a hard error; every verification
/// failure is absorbed into a fallback to the input URL.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The syndicated copy could not be fetched
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
}

impl DiscoveryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiscoveryError::Fetch { .. } => ErrorKind::Fetch,
        }
    }
}

/// Errors that can occur while verifying a candidate original post.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The candidate could not be fetched
    #[error("failed to fetch candidate {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// The candidate was not served as HTML
    #[error("document at {effective_url} was not transmitted as text/html (got {content_type:?})")]
    WrongContentType {
        effective_url: String,
        content_type: Option<String>,
    },

    /// Nothing on the candidate links back to the syndicated copy
    #[error("no syndication link at {effective_url} resolves to the syndicated copy")]
    NoMatch { effective_url: String },
}

impl VerificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerificationError::Fetch { .. } => ErrorKind::VerificationFetch,
            VerificationError::WrongContentType { .. } => ErrorKind::WrongContentType,
            VerificationError::NoMatch { .. } => ErrorKind::NoMatch,
        }
    }
}

/// Errors that can occur during a single fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Security validation failed
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Connection timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, internal IPs)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// Result type alias for resolution operations.
pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;

/// Result type alias for verification operations.
pub type VerifyResult<T> = std::result::Result<T, VerificationError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
