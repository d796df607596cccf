//! Fetcher implementations.
//!
//! # Available Fetchers
//!
//! - `HttpFetcher` - reqwest-based transport that follows redirects
//! - `MockFetcher` - canned responses for testing
//! - `ValidatedFetcher` - SSRF guard wrapping any other fetcher
//!
//! # Example
//!
//! ```rust,ignore
//! use post_discovery::fetchers::{HttpFetcher, ValidatedFetcher};
//!
//! let fetcher = ValidatedFetcher::new(HttpFetcher::new(&DiscoveryConfig::default())?);
//! let page = fetcher.fetch("https://twitter.com/aaronpk/status/1").await?;
//! ```

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::{MockFetcher, MockFetcherBuilder};

// Re-export from traits for convenience
pub use crate::traits::fetcher::{Fetcher, UrlValidator, ValidatedFetcher};
