//! Mock fetcher for testing.
//!
//! Provides a configurable mock implementation of the Fetcher trait.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;
use crate::types::page::FetchedPage;

#[derive(Debug, Clone)]
enum MockOutcome {
    Page(FetchedPage),
    Status(u16),
    Unreachable,
}

#[derive(Debug, Clone)]
struct MockRoute {
    outcome: MockOutcome,
    delay: Option<Duration>,
}

/// Mock fetcher for testing.
///
/// Routes are keyed by requested URL. Unknown URLs fail like a refused
/// connection.
///
/// # Example
///
/// ```rust
/// use post_discovery::fetchers::MockFetcherBuilder;
///
/// let mock = MockFetcherBuilder::new()
///     .html("https://example.com/post", "<html></html>")
///     .redirect("http://t.co/x", "https://twitter.com/a/status/1", "<html></html>")
///     .build();
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    /// Canned routes indexed by requested URL
    routes: Arc<RwLock<HashMap<String, MockRoute>>>,
    /// Track calls for verification
    fetch_calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, url: impl Into<String>, outcome: MockOutcome) {
        let mut routes = self.routes.write().unwrap();
        let url = url.into();
        let delay = routes.get(&url).and_then(|r| r.delay);
        routes.insert(url, MockRoute { outcome, delay });
    }

    /// Serve a page. The page's `requested_url` is the route key.
    pub fn add_page(&self, page: FetchedPage) {
        self.insert(page.requested_url.clone(), MockOutcome::Page(page));
    }

    /// Answer `url` with a non-success status.
    pub fn add_status(&self, url: impl Into<String>, status: u16) {
        self.insert(url, MockOutcome::Status(status));
    }

    /// Fail `url` with a transport error.
    pub fn add_unreachable(&self, url: impl Into<String>) {
        self.insert(url, MockOutcome::Unreachable);
    }

    /// Delay the response for `url`.
    pub fn set_delay(&self, url: &str, delay: Duration) {
        let mut routes = self.routes.write().unwrap();
        let route = routes.entry(url.to_string()).or_insert(MockRoute {
            outcome: MockOutcome::Unreachable,
            delay: None,
        });
        route.delay = Some(delay);
    }

    /// Get the number of fetches made.
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.read().unwrap().len()
    }

    /// Get the URLs that were fetched, in call order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.read().unwrap().clone()
    }

    /// Whether `url` was fetched at least once.
    pub fn was_fetched(&self, url: &str) -> bool {
        self.fetch_calls.read().unwrap().iter().any(|u| u == url)
    }

    /// Clear all recorded calls.
    pub fn reset_calls(&self) {
        self.fetch_calls.write().unwrap().clear();
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.fetch_calls.write().unwrap().push(url.to_string());

        let route = self.routes.read().unwrap().get(url).cloned();
        let Some(route) = route else {
            return Err(FetchError::Http(format!("connection refused: {}", url).into()));
        };

        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }

        match route.outcome {
            MockOutcome::Page(page) => Ok(page.with_fetched_at(Utc::now())),
            MockOutcome::Status(status) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            MockOutcome::Unreachable => {
                Err(FetchError::Http(format!("connection refused: {}", url).into()))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Builder for creating test scenarios with the mock fetcher.
pub struct MockFetcherBuilder {
    mock: MockFetcher,
}

impl MockFetcherBuilder {
    /// Start building a mock fetcher.
    pub fn new() -> Self {
        Self {
            mock: MockFetcher::new(),
        }
    }

    /// Serve `body` as `text/html` from `url`.
    pub fn html(self, url: &str, body: &str) -> Self {
        self.content(url, "text/html; charset=utf-8", body)
    }

    /// Serve `body` with an explicit content type.
    pub fn content(self, url: &str, content_type: &str, body: &str) -> Self {
        self.mock
            .add_page(FetchedPage::new(url, body).with_content_type(content_type));
        self
    }

    /// Serve HTML from `to` when `from` is requested.
    pub fn redirect(self, from: &str, to: &str, body: &str) -> Self {
        self.mock.add_page(
            FetchedPage::new(from, body)
                .with_effective_url(to)
                .with_content_type("text/html; charset=utf-8"),
        );
        self
    }

    /// Serve a fully specified page.
    pub fn page(self, page: FetchedPage) -> Self {
        self.mock.add_page(page);
        self
    }

    /// Answer with an HTTP error status.
    pub fn status(self, url: &str, status: u16) -> Self {
        self.mock.add_status(url, status);
        self
    }

    /// Fail with a transport error.
    pub fn unreachable(self, url: &str) -> Self {
        self.mock.add_unreachable(url);
        self
    }

    /// Delay the response for `url`.
    pub fn delay(self, url: &str, delay: Duration) -> Self {
        self.mock.set_delay(url, delay);
        self
    }

    /// Build the mock fetcher.
    pub fn build(self) -> MockFetcher {
        self.mock
    }
}

impl Default for MockFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
