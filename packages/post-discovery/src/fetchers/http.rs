//! HTTP-based fetcher implementation.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;
use crate::types::{config::DiscoveryConfig, page::FetchedPage};

/// HTTP fetcher backed by a shared `reqwest::Client`.
///
/// Redirects are followed up to `max_redirects`; the final URL is reported
/// as the page's effective URL. Non-2xx responses are errors.
///
/// # Example
///
/// ```rust,ignore
/// let fetcher = HttpFetcher::new(&DiscoveryConfig::default())?;
/// let page = fetcher.fetch("http://t.co/abc").await?;
/// println!("{} -> {}", page.requested_url, page.effective_url);
/// ```
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with timeouts, redirect policy and user agent from `config`.
    pub fn new(config: &DiscoveryConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Use a pre-built HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        debug!(url = %url, "HTTP fetch starting");

        let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Http(Box::new(e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Capture final URL after redirects
        let effective_url = response.url().to_string();

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Http(Box::new(e))
            }
        })?;

        debug!(
            url = %url,
            effective_url = %effective_url,
            status = status.as_u16(),
            content_length = body.len(),
            "HTTP fetch completed"
        );

        Ok(FetchedPage {
            requested_url: url.to_string(),
            effective_url,
            status: status.as_u16(),
            content_type,
            body,
            fetched_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
