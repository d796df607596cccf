//! Resolution orchestrator.
//!
//! One call walks `fetch → extract → verify` exactly once. The only hard
//! error is an unreachable syndicated copy; every other failure falls back
//! to the input URL itself.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{DiscoveryError, VerifyResult};
use crate::extract::ExtractorRegistry;
use crate::fetchers::{HttpFetcher, ValidatedFetcher};
use crate::parsers::Mf2Parser;
use crate::sanitize::{canonical_url, clean_string, web_address_to_uri};
use crate::traits::{fetcher::Fetcher, parser::MetadataParser};
use crate::types::{
    config::DiscoveryConfig,
    resolution::{Resolution, ResolutionResult, SyndicatedCopy},
};
use crate::verify::verify;

/// Finds the original of a syndicated copy.
///
/// # Example
///
/// ```rust,ignore
/// let discovery = OriginalPostDiscovery::new(HttpFetcher::new(&config)?).with_config(config);
/// let resolution = discovery
///     .resolve("https://twitter.com/BarnabyWalters/status/423465842148671488")
///     .await?;
/// println!("{}", resolution.original_url);
/// ```
pub struct OriginalPostDiscovery<F: Fetcher> {
    fetcher: F,
    parser: Arc<dyn MetadataParser>,
    registry: ExtractorRegistry,
    config: DiscoveryConfig,
}

impl<F: Fetcher> OriginalPostDiscovery<F> {
    /// Create with the default parser, built-in extractors and config.
    pub fn new(fetcher: F) -> Self {
        let parser: Arc<dyn MetadataParser> = Arc::new(Mf2Parser::new());
        Self {
            fetcher,
            registry: ExtractorRegistry::builtin(parser.clone()),
            parser,
            config: DiscoveryConfig::default(),
        }
    }

    /// Use a different metadata parser. Built-in extractors are rebuilt
    /// around it; call [`with_registry`](Self::with_registry) afterwards to
    /// customise them.
    pub fn with_parser(mut self, parser: Arc<dyn MetadataParser>) -> Self {
        self.registry = ExtractorRegistry::builtin(parser.clone());
        self.parser = parser;
        self
    }

    /// Use a custom extractor registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Candidate original URL for a syndicated copy, if any heuristic matches.
    pub fn extract_candidate(&self, copy: &SyndicatedCopy) -> Option<String> {
        self.registry
            .extract_candidate(&copy.platform, &copy.raw_content)
    }

    /// Verify a candidate against a syndicated URL.
    pub async fn verify(&self, candidate_url: &str, syndicated_url: &str) -> VerifyResult<String> {
        verify(
            &self.fetcher,
            self.parser.as_ref(),
            &self.config,
            candidate_url,
            syndicated_url,
        )
        .await
    }

    /// Resolve the original post for `url`.
    pub async fn resolve(&self, url: &str) -> ResolutionResult {
        let url = canonical_url(&web_address_to_uri(&clean_string(url)));

        let page = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|source| {
                warn!(url = %url, error = %source, "Failed to fetch syndicated copy");
                DiscoveryError::Fetch {
                    url: url.clone(),
                    source,
                }
            })?;

        let platform = self.registry.platform_for_url(&url);
        let copy = SyndicatedCopy::new(url, platform, page.body);

        let Some(candidate) = self.extract_candidate(&copy) else {
            info!(url = %copy.source_url, platform = %copy.platform, "No candidate found, using URL itself");
            return Ok(Resolution::self_fallback(copy.source_url, None));
        };

        match self.verify(&candidate, &copy.source_url).await {
            Ok(original_url) => {
                info!(url = %copy.source_url, original = %original_url, "Original post verified");
                Ok(Resolution::verified(original_url))
            }
            Err(e) => {
                warn!(
                    url = %copy.source_url,
                    candidate = %candidate,
                    error = %e,
                    "Candidate failed verification, using URL itself"
                );
                Ok(Resolution::self_fallback(copy.source_url, Some(e.kind())))
            }
        }
    }
}

/// Resolve `url` over HTTP with default settings and SSRF protection.
pub async fn resolve_original_post(url: &str) -> ResolutionResult {
    let config = DiscoveryConfig::default();
    let fetcher = HttpFetcher::new(&config).map_err(|source| DiscoveryError::Fetch {
        url: url.to_string(),
        source,
    })?;

    OriginalPostDiscovery::new(ValidatedFetcher::new(fetcher))
        .with_config(config)
        .resolve(url)
        .await
}
