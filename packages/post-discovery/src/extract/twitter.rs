//! Candidate extraction for tweets.

use std::sync::Arc;

use crate::extract::{heuristics, CandidateExtractor, Platform};
use crate::parsers::Mf2Parser;
use crate::traits::parser::MetadataParser;
use crate::types::document::find_entries;

/// Finds the original post a tweet was syndicated from.
///
/// The tweet is read through the parser's Twitter shim; the first `h-entry`
/// content, minus hashtags, is fed to the text heuristics.
#[derive(Clone)]
pub struct TwitterExtractor {
    parser: Arc<dyn MetadataParser>,
}

impl Default for TwitterExtractor {
    fn default() -> Self {
        Self::new(Arc::new(Mf2Parser::new()))
    }
}

impl TwitterExtractor {
    pub fn new(parser: Arc<dyn MetadataParser>) -> Self {
        Self { parser }
    }
}

impl CandidateExtractor for TwitterExtractor {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    fn hosts(&self) -> Vec<String> {
        vec!["twitter.com".to_string(), "www.twitter.com".to_string()]
    }

    fn extract_candidate(&self, content: &str) -> Option<String> {
        let entries = self
            .parser
            .parse_platform_markup(&Platform::Twitter, content);
        let entry = find_entries(&entries, |e| e.has_type("h-entry"))
            .into_iter()
            .next()?;

        let text = heuristics::strip_hashtags(entry.plaintext("content").unwrap_or_default());
        heuristics::candidate_from_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(text_html: &str) -> String {
        format!(
            r#"<div class="permalink-tweet tweet" data-permalink-path="/someone/status/1">
                 <p class="tweet-text">{}</p>
               </div>"#,
            text_html
        )
    }

    #[test]
    fn test_finds_trailing_url() {
        let html = tweet("New post http://example.com/posts/1 #blog");
        assert_eq!(
            TwitterExtractor::default().extract_candidate(&html),
            Some("http://example.com/posts/1".to_string())
        );
    }

    #[test]
    fn test_finds_parenthesized_expanded_link() {
        let html = tweet(
            r#"Just a note (<a href="http://t.co/zzz" data-expanded-url="http://aaron.pk/r4U11">aaron.pk/r4U11</a>)"#,
        );
        assert_eq!(
            TwitterExtractor::default().extract_candidate(&html),
            Some("http://aaron.pk/r4U11".to_string())
        );
    }

    #[test]
    fn test_finds_permashortcitation() {
        let html = tweet("Testing permashortcitations (ttk.me t4U91)");
        assert_eq!(
            TwitterExtractor::default().extract_candidate(&html),
            Some("http://ttk.me/t4U91".to_string())
        );
    }

    #[test]
    fn test_no_entry_means_no_candidate() {
        assert_eq!(
            TwitterExtractor::default().extract_candidate("<p>no tweet here</p>"),
            None
        );
    }

    #[test]
    fn test_no_heuristic_match() {
        let html = tweet("Just chatting about soup #soup");
        assert_eq!(TwitterExtractor::default().extract_candidate(&html), None);
    }
}
