//! Verification of a candidate original post.
//!
//! A candidate only counts as the original if it links back to the
//! syndicated copy. Three checks run in order:
//!
//! 1. a page-level `rel="syndication"` link equal to the syndicated URL
//! 2. an entry with a `syndication` property equal to the syndicated URL
//! 3. every declared syndication link fetched concurrently, matching on the
//!    effective URL (catches shorteners and moved URLs)
//!
//! URLs are compared in their canonical serialization, the form both the
//! parser and the HTTP client produce.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::error::{FetchError, VerificationError, VerifyResult};
use crate::sanitize::canonical_url;
use crate::traits::{fetcher::Fetcher, parser::MetadataParser};
use crate::types::{config::DiscoveryConfig, document::StructuredDocument};

const SYNDICATION: &str = "syndication";

/// Verify that `candidate_url` is the original of `syndicated_url`.
///
/// On success returns the candidate's effective URL, or for the fallback
/// scan the effective URL of the matching syndication link.
pub async fn verify<F, P>(
    fetcher: &F,
    parser: &P,
    config: &DiscoveryConfig,
    candidate_url: &str,
    syndicated_url: &str,
) -> VerifyResult<String>
where
    F: Fetcher + ?Sized,
    P: MetadataParser + ?Sized,
{
    debug!(candidate = %candidate_url, syndicated = %syndicated_url, "Verifying candidate");
    let syndicated_url = canonical_url(syndicated_url);
    let syndicated_url = syndicated_url.as_str();

    let page = match tokio::time::timeout(config.fetch_timeout, fetcher.fetch(candidate_url)).await
    {
        Ok(Ok(page)) => page,
        Ok(Err(source)) => {
            return Err(VerificationError::Fetch {
                url: candidate_url.to_string(),
                source,
            })
        }
        Err(_) => {
            return Err(VerificationError::Fetch {
                url: candidate_url.to_string(),
                source: FetchError::Timeout {
                    url: candidate_url.to_string(),
                },
            })
        }
    };

    let effective_url = page.effective_url.clone();

    if !page.is_html() {
        return Err(VerificationError::WrongContentType {
            effective_url,
            content_type: page.content_type,
        });
    }

    let mut doc = parser.parse(&page.body, &effective_url);
    doc.content_type = page.content_type;

    if links_back(&doc, syndicated_url) {
        info!(original = %effective_url, syndicated = %syndicated_url, "Candidate links back directly");
        return Ok(effective_url);
    }

    let links = doc.collect_links(SYNDICATION);
    if let Some(matched) = resolve_syndication_links(fetcher, config, links, syndicated_url).await {
        info!(
            original = %effective_url,
            matched = %matched,
            "Syndication link resolves to the syndicated copy"
        );
        return Ok(matched);
    }

    Err(VerificationError::NoMatch { effective_url })
}

/// Match on page rels, then on entry properties.
fn links_back(doc: &StructuredDocument, syndicated_url: &str) -> bool {
    let matches = |url: &str| canonical_url(url) == syndicated_url;

    if doc.rel_urls(SYNDICATION).iter().any(|u| matches(u)) {
        return true;
    }
    !doc
        .find_entries(|e| e.plaintext_values(SYNDICATION).into_iter().any(matches))
        .is_empty()
}

/// Fetch every syndication link and return the first (by completion) whose
/// effective URL equals `syndicated_url`.
///
/// Fan-out is bounded by `max_concurrent_fetches`; each fetch by
/// `fetch_timeout` and the whole scan by `scan_timeout`. Returning drops
/// the stream, which cancels fetches still in flight.
async fn resolve_syndication_links<F>(
    fetcher: &F,
    config: &DiscoveryConfig,
    links: Vec<String>,
    syndicated_url: &str,
) -> Option<String>
where
    F: Fetcher + ?Sized,
{
    if links.is_empty() {
        return None;
    }

    debug!(
        link_count = links.len(),
        "Resolving syndication links (max {} concurrent)",
        config.max_concurrent_fetches,
    );

    let fetch_timeout = config.fetch_timeout;
    let fetches: Vec<_> = links
        .into_iter()
        .map(|link| async move {
            let result = tokio::time::timeout(fetch_timeout, fetcher.fetch(&link)).await;
            (link, result)
        })
        .collect();

    let mut responses = stream::iter(fetches).buffer_unordered(config.max_concurrent_fetches.max(1));

    let scan = async {
        while let Some((link, result)) = responses.next().await {
            match result {
                Ok(Ok(page)) if canonical_url(&page.effective_url) == syndicated_url => {
                    return Some(page.effective_url);
                }
                Ok(Ok(page)) => {
                    debug!(link = %link, effective_url = %page.effective_url, "Syndication link does not match");
                }
                Ok(Err(e)) => {
                    debug!(link = %link, error = %e, "Syndication link fetch failed");
                }
                Err(_) => {
                    debug!(link = %link, "Syndication link fetch timed out");
                }
            }
        }
        None
    };

    match tokio::time::timeout(config.scan_timeout, scan).await {
        Ok(found) => found,
        Err(_) => {
            warn!(
                timeout_secs = config.scan_timeout.as_secs(),
                "Syndication scan hit its time ceiling"
            );
            None
        }
    }
}

/// Verification bound to one fetcher, parser and config.
pub struct Verifier<'a, F: ?Sized, P: ?Sized> {
    fetcher: &'a F,
    parser: &'a P,
    config: &'a DiscoveryConfig,
}

impl<'a, F, P> Verifier<'a, F, P>
where
    F: Fetcher + ?Sized,
    P: MetadataParser + ?Sized,
{
    pub fn new(fetcher: &'a F, parser: &'a P, config: &'a DiscoveryConfig) -> Self {
        Self {
            fetcher,
            parser,
            config,
        }
    }

    /// See [`verify`].
    pub async fn verify(&self, candidate_url: &str, syndicated_url: &str) -> VerifyResult<String> {
        verify(
            self.fetcher,
            self.parser,
            self.config,
            candidate_url,
            syndicated_url,
        )
        .await
    }
}
