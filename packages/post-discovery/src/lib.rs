//! Original Post Discovery
//!
//! Given the URL of a syndicated copy of a post (a tweet, say), find the URL
//! of the original post on the author's own site.
//!
//! # Design Philosophy
//!
//! **"Never lose the URL"**
//!
//! - A candidate only counts once it links back to the copy
//! - Any failure after the copy is fetched falls back to the copy itself
//! - Platform heuristics are pluggable, verification is shared
//! - Fetching and markup parsing sit behind traits for testing
//!
//! # Usage
//!
//! ```rust,ignore
//! use post_discovery::{DiscoveryConfig, HttpFetcher, OriginalPostDiscovery, ValidatedFetcher};
//!
//! let config = DiscoveryConfig::from_env()?;
//! let fetcher = ValidatedFetcher::new(HttpFetcher::new(&config)?);
//! let discovery = OriginalPostDiscovery::new(fetcher).with_config(config);
//!
//! let resolution = discovery
//!     .resolve("https://twitter.com/aaronpk/status/421430244468101120")
//!     .await?;
//! println!("{} ({:?})", resolution.original_url, resolution.method);
//! ```
//!
//! # Modules
//!
//! - [`sanitize`] - Byte and string cleanup, bare address normalization
//! - [`extract`] - Platform registry and candidate heuristics
//! - [`verify`] - Link-back verification of a candidate
//! - [`discovery`] - The resolution orchestrator
//! - [`traits`] - Fetcher and metadata parser abstractions
//! - [`fetchers`] - HTTP and mock fetchers
//! - [`parsers`] - Microformats2 parser and the Twitter shim
//! - [`types`] - Pages, documents, resolutions and config

pub mod discovery;
pub mod error;
pub mod extract;
pub mod fetchers;
pub mod parsers;
pub mod sanitize;
pub mod traits;
pub mod types;
pub mod verify;

// Re-export core types at crate root
pub use discovery::{resolve_original_post, OriginalPostDiscovery};
pub use error::{
    ConfigError, DiscoveryError, DiscoveryResult, ErrorKind, FetchError, SecurityError,
    VerificationError,
};
pub use extract::{
    extract_candidate, permashortcitation_url, strip_hashtags, trailing_url, CandidateExtractor,
    ExtractorRegistry, Platform,
};
pub use fetchers::{HttpFetcher, MockFetcher, MockFetcherBuilder};
pub use parsers::Mf2Parser;
pub use sanitize::{canonical_url, clean_bytes, clean_string, web_address_to_uri};
pub use traits::{
    fetcher::{Fetcher, UrlValidator, ValidatedFetcher},
    parser::MetadataParser,
};
pub use types::{
    config::DiscoveryConfig,
    document::{Entry, PropertyValue, StructuredDocument},
    page::FetchedPage,
    resolution::{Resolution, ResolutionMethod, ResolutionResult, SyndicatedCopy},
};
pub use verify::{verify, Verifier};
