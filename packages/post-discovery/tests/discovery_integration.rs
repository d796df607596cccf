//! Integration tests for original post discovery
//!
//! Run with: cargo test -p post-discovery --test discovery_integration
//!
//! Tweet fixtures follow the 2014 permalink page markup, trimmed to what
//! the shim reads.

use std::sync::Arc;

use post_discovery::{
    extract_candidate, ErrorKind, ExtractorRegistry, MetadataParser, Mf2Parser, MockFetcher,
    MockFetcherBuilder, OriginalPostDiscovery, Platform, Resolution, ResolutionMethod,
    ValidatedFetcher,
};
use tokio_test::{assert_err, assert_ok};

const AARONPK_HTML: &str = include_str!("fixtures/aaronpk-twitter-parenthesis-link.html");
const BARNABY_HTML: &str = include_str!("fixtures/barnabywalters-twitter-ellipsis-link.html");
const TANTEK_HTML: &str = include_str!("fixtures/tantek-twitter-permashortcitation.html");
const WATERPIGS_NOTE_HTML: &str = include_str!("fixtures/waterpigs-note.html");

const BARNABY_TWEET: &str = "https://twitter.com/BarnabyWalters/status/423465842148671488";
const BARNABY_NOTE: &str = "http://waterpigs.co.uk/notes/4U5Ejy/";

fn waterpigs_mock() -> MockFetcher {
    MockFetcherBuilder::new()
        .html(BARNABY_TWEET, BARNABY_HTML)
        .redirect(
            BARNABY_NOTE,
            "https://waterpigs.co.uk/notes/4U5Ejy/",
            WATERPIGS_NOTE_HTML,
        )
        .redirect("http://t.co/shortened-copy", BARNABY_TWEET, "")
        .build()
}

// ============================================================================
// Candidate extraction from tweet fixtures
// ============================================================================

#[test]
fn test_twitter_finds_parenthesized_link() {
    assert_eq!(
        extract_candidate(&Platform::Twitter, AARONPK_HTML).as_deref(),
        Some("http://aaron.pk/r4U11")
    );
}

#[test]
fn test_twitter_finds_ellipsis_link() {
    assert_eq!(
        extract_candidate(&Platform::Twitter, BARNABY_HTML).as_deref(),
        Some(BARNABY_NOTE)
    );
}

#[test]
fn test_twitter_finds_permashortcitation() {
    assert_eq!(
        extract_candidate(&Platform::Twitter, TANTEK_HTML).as_deref(),
        Some("http://ttk.me/t4U91")
    );
}

#[test]
fn test_tweet_fixture_parses_as_entry() {
    let entries = Mf2Parser::new().parse_platform_markup(&Platform::Twitter, BARNABY_HTML);
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert!(entry.has_type("h-entry"));
    assert_eq!(entry.plaintext("url"), Some(BARNABY_TWEET));
    assert_eq!(
        entry.plaintext("published"),
        Some("2014-01-15T22:22:02+00:00")
    );
}

// ============================================================================
// Full resolution flow
// ============================================================================

#[tokio::test]
async fn test_resolves_through_shortened_syndication_link() {
    let mock = waterpigs_mock();
    let discovery = OriginalPostDiscovery::new(mock.clone());

    let resolution = assert_ok!(discovery.resolve(BARNABY_TWEET).await);

    // The matching syndication link's effective URL is what comes back.
    assert_eq!(resolution, Resolution::verified(BARNABY_TWEET));
    assert!(mock.was_fetched(BARNABY_NOTE));
    assert!(mock.was_fetched("http://t.co/shortened-copy"));
    assert_eq!(mock.fetch_call_count(), 3);
}

#[tokio::test]
async fn test_resolves_direct_rel_to_candidate_effective_url() {
    let note = WATERPIGS_NOTE_HTML.replace("http://t.co/shortened-copy", BARNABY_TWEET);
    let mock = MockFetcherBuilder::new()
        .html(BARNABY_TWEET, BARNABY_HTML)
        .redirect(BARNABY_NOTE, "https://waterpigs.co.uk/notes/4U5Ejy/", &note)
        .build();

    let resolution = assert_ok!(OriginalPostDiscovery::new(mock.clone())
        .resolve(BARNABY_TWEET)
        .await);

    assert_eq!(
        resolution,
        Resolution::verified("https://waterpigs.co.uk/notes/4U5Ejy/")
    );
    assert_eq!(mock.fetch_call_count(), 2);
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let discovery = OriginalPostDiscovery::new(waterpigs_mock());

    let first = assert_ok!(discovery.resolve(BARNABY_TWEET).await);
    let second = assert_ok!(discovery.resolve(BARNABY_TWEET).await);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_candidate_without_link_back_falls_back() {
    let mock = MockFetcherBuilder::new()
        .html(BARNABY_TWEET, BARNABY_HTML)
        .html(BARNABY_NOTE, "<article class=\"h-entry\"><p class=\"p-name\">Hi</p></article>")
        .build();

    let resolution = assert_ok!(OriginalPostDiscovery::new(mock)
        .resolve(BARNABY_TWEET)
        .await);

    assert_eq!(resolution.original_url, BARNABY_TWEET);
    assert_eq!(resolution.method, ResolutionMethod::SelfFallback);
    assert_eq!(resolution.fallback_reason, Some(ErrorKind::NoMatch));
}

#[tokio::test]
async fn test_unreachable_candidate_falls_back() {
    let mock = MockFetcherBuilder::new()
        .html(BARNABY_TWEET, BARNABY_HTML)
        .unreachable(BARNABY_NOTE)
        .build();

    let resolution = assert_ok!(OriginalPostDiscovery::new(mock)
        .resolve(BARNABY_TWEET)
        .await);

    assert_eq!(
        resolution,
        Resolution::self_fallback(BARNABY_TWEET, Some(ErrorKind::VerificationFetch))
    );
}

#[tokio::test]
async fn test_tweet_without_candidate_falls_back() {
    let url = "https://twitter.com/someone/status/1";
    let html = r#"<div class="permalink-tweet"><p class="tweet-text">just soup today #soup</p></div>"#;
    let mock = MockFetcherBuilder::new().html(url, html).build();

    let resolution = assert_ok!(OriginalPostDiscovery::new(mock.clone()).resolve(url).await);

    assert_eq!(resolution, Resolution::self_fallback(url, None));
    assert_eq!(mock.fetch_call_count(), 1);
}

#[tokio::test]
async fn test_unreachable_copy_is_an_error() {
    let mock = MockFetcherBuilder::new().status(BARNABY_TWEET, 503).build();

    let err = assert_err!(OriginalPostDiscovery::new(mock).resolve(BARNABY_TWEET).await);
    assert_eq!(err.kind(), ErrorKind::Fetch);
}

#[tokio::test]
async fn test_validated_fetcher_blocks_private_candidate() {
    let html = BARNABY_HTML.replace(BARNABY_NOTE, "http://127.0.0.1/notes/1");
    let mock = MockFetcherBuilder::new()
        .html(BARNABY_TWEET, &html)
        .html("http://127.0.0.1/notes/1", WATERPIGS_NOTE_HTML)
        .build();

    let fetcher = ValidatedFetcher::new(mock.clone()).without_dns();

    let resolution = assert_ok!(OriginalPostDiscovery::new(fetcher)
        .resolve(BARNABY_TWEET)
        .await);

    assert_eq!(
        resolution,
        Resolution::self_fallback(BARNABY_TWEET, Some(ErrorKind::VerificationFetch))
    );
    assert!(!mock.was_fetched("http://127.0.0.1/notes/1"));
}

#[tokio::test]
async fn test_custom_parser_reaches_extractors() {
    struct NoTweets;

    impl MetadataParser for NoTweets {
        fn parse(&self, html: &str, base_url: &str) -> post_discovery::StructuredDocument {
            Mf2Parser::new().parse(html, base_url)
        }

        fn parse_platform_markup(
            &self,
            _platform: &Platform,
            _html: &str,
        ) -> Vec<post_discovery::Entry> {
            Vec::new()
        }
    }

    let mock = waterpigs_mock();
    let discovery = OriginalPostDiscovery::new(mock.clone()).with_parser(Arc::new(NoTweets));

    let resolution = assert_ok!(discovery.resolve(BARNABY_TWEET).await);
    assert_eq!(resolution, Resolution::self_fallback(BARNABY_TWEET, None));
    assert_eq!(discovery.registry().platforms(), vec![Platform::Twitter]);
    assert!(!mock.was_fetched(BARNABY_NOTE));

    let empty = OriginalPostDiscovery::new(waterpigs_mock()).with_registry(ExtractorRegistry::empty());
    let resolution = assert_ok!(empty.resolve(BARNABY_TWEET).await);
    assert_eq!(resolution.method, ResolutionMethod::SelfFallback);
}
