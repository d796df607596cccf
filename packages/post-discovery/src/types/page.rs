//! Page types - fetched responses as seen by the resolution engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fetched page, after all redirects have been followed.
///
/// `requested_url` is what was asked for; `effective_url` is where the
/// transport ended up. The two differ whenever the server redirected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    /// URL passed to the fetcher
    pub requested_url: String,

    /// Final URL after redirects
    pub effective_url: String,

    /// HTTP status of the final response
    pub status: u16,

    /// Value of the Content-Type header, if any
    pub content_type: Option<String>,

    /// Response body
    pub body: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Create a page that was served from `url` without redirects.
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            effective_url: url.clone(),
            requested_url: url,
            status: 200,
            content_type: None,
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Set the effective URL (simulates a redirect).
    pub fn with_effective_url(mut self, url: impl Into<String>) -> Self {
        self.effective_url = url.into();
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the fetched timestamp.
    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = fetched_at;
        self
    }

    /// Whether the response was served as HTML (case-insensitive).
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("html"))
            .unwrap_or(false)
    }

    /// Whether the transport followed at least one redirect.
    pub fn was_redirected(&self) -> bool {
        self.requested_url != self.effective_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_detection_is_case_insensitive() {
        let page = FetchedPage::new("http://example.com/", "")
            .with_content_type("Text/HTML; charset=utf-8");
        assert!(page.is_html());

        let xhtml = FetchedPage::new("http://example.com/", "")
            .with_content_type("application/xhtml+xml");
        assert!(xhtml.is_html());
    }

    #[test]
    fn test_missing_content_type_is_not_html() {
        let page = FetchedPage::new("http://example.com/", "<html></html>");
        assert!(!page.is_html());

        let json = page.clone().with_content_type("application/json");
        assert!(!json.is_html());
    }

    #[test]
    fn test_redirect_detection() {
        let page = FetchedPage::new("http://t.co/abc", "");
        assert!(!page.was_redirected());

        let page = page.with_effective_url("https://twitter.com/a/status/1");
        assert!(page.was_redirected());
        assert_eq!(page.requested_url, "http://t.co/abc");
    }
}
