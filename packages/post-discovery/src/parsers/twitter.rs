//! Twitter markup shim.
//!
//! Tweet permalink pages carry no microformats, so the tweet is read from
//! Twitter's own classes and turned into a single `h-entry`.

use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::types::document::Entry;

const TWITTER_BASE: &str = "https://twitter.com/";

lazy_static! {
    static ref PERMALINK_TWEET: Selector =
        Selector::parse(".permalink-tweet").expect("valid selector");
    static ref TWEET: Selector = Selector::parse(".tweet").expect("valid selector");
    static ref TWEET_TEXT: Selector = Selector::parse(".tweet-text").expect("valid selector");
    static ref FULLNAME: Selector = Selector::parse(".fullname").expect("valid selector");
    static ref USERNAME: Selector = Selector::parse(".username").expect("valid selector");
    static ref TIMESTAMP: Selector =
        Selector::parse("._timestamp[data-time]").expect("valid selector");
}

/// Extract the tweet on a Twitter page as an `h-entry`.
///
/// Returns an empty list when the page holds no recognisable tweet.
pub fn parse_twitter(html: &str) -> Vec<Entry> {
    let document = Html::parse_document(html);

    let Some(tweet) = document
        .select(&PERMALINK_TWEET)
        .next()
        .or_else(|| document.select(&TWEET).next())
    else {
        return Vec::new();
    };

    let mut entry = Entry::new("h-entry");

    if let Some(text) = tweet.select(&TWEET_TEXT).next() {
        let mut content = String::new();
        expanded_text(text, &mut content);
        let content = collapse_whitespace(&content);
        entry.add_property("name", content.clone());
        entry.add_property("content", content);
    }

    if let Some(path) = tweet.value().attr("data-permalink-path") {
        if let Ok(url) = Url::parse(TWITTER_BASE).and_then(|base| base.join(path)) {
            entry.add_property("url", url.to_string());
        }
    }

    if let Some(published) = tweet
        .select(&TIMESTAMP)
        .next()
        .and_then(|el| el.value().attr("data-time"))
        .and_then(|secs| secs.parse::<i64>().ok())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    {
        entry.add_property("published", published.to_rfc3339());
    }

    if let Some(author) = parse_author(tweet) {
        entry.add_property("author", author);
    }

    vec![entry]
}

fn parse_author(tweet: ElementRef<'_>) -> Option<Entry> {
    let name = tweet
        .select(&FULLNAME)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()));
    let username = tweet
        .select(&USERNAME)
        .next()
        .map(|el| el.text().collect::<String>())
        .map(|u| u.trim().trim_start_matches('@').to_string())
        .filter(|u| !u.is_empty());

    if name.is_none() && username.is_none() {
        return None;
    }

    let mut card = Entry::new("h-card");
    if let Some(name) = &name {
        card.add_property("name", name.clone());
    }
    if let Some(username) = &username {
        card.add_property("nickname", username.clone());
        card.add_property("url", format!("{}{}", TWITTER_BASE, username));
    }
    card.value = name.or(username);
    Some(card)
}

/// Plain text of a tweet, with shortened links replaced by their expanded URL.
fn expanded_text(el: ElementRef<'_>, out: &mut String) {
    for node in el.children() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(node) else {
                    continue;
                };
                match child.value().attr("data-expanded-url") {
                    Some(expanded) => out.push_str(expanded),
                    None => expanded_text(child, out),
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
