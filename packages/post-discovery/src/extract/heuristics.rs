//! Text heuristics for spotting an original-post link in a syndicated copy.
//!
//! All functions work on the plain text of a post and split on single
//! spaces, the way the posting tools that append these links write them.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::sanitize::{clean_string, web_address_to_uri};

lazy_static! {
    static ref HASHTAG: Regex = Regex::new(r"(?i)#[a-z0-9]+").expect("valid regex");
}

/// Remove every `#tag` and trim the result.
pub fn strip_hashtags(content: &str) -> String {
    HASHTAG.replace_all(content, "").trim().to_string()
}

/// Whether `text` is an absolute URL with a non-empty host.
fn has_host(text: &str) -> bool {
    Url::parse(text)
        .ok()
        .and_then(|url| url.host_str().map(|host| !host.is_empty()))
        .unwrap_or(false)
}

/// A URL as the last token, bare or wrapped in parentheses.
pub fn trailing_url(content: &str) -> Option<String> {
    let last = content.split(' ').next_back()?;

    let url = if has_host(last) {
        last
    } else if last.starts_with('(') {
        let inner = last.trim_matches(['(', ')']);
        if !has_host(inner) {
            return None;
        }
        inner
    } else {
        return None;
    };

    let url = clean_string(&web_address_to_uri(url)).trim().to_string();
    (!url.is_empty()).then_some(url)
}

/// A permashortcitation, `(domain path)`, as the last two tokens.
pub fn permashortcitation_url(content: &str) -> Option<String> {
    let mut tokens = content.split(' ').rev();
    let last = tokens.next()?;
    let penultimate = tokens.next().unwrap_or("");
    let cite = format!("{} {}", penultimate, last);

    if !(cite.starts_with('(') && cite.ends_with(')')) {
        return None;
    }

    let inner = cite.trim_matches(['(', ')']);
    let (domain, path) = inner.split_once(' ')?;
    if domain.is_empty() || path.is_empty() || path.contains(' ') {
        return None;
    }

    let domain = format!("http://{}", domain);
    if !has_host(&domain) {
        return None;
    }

    Some(format!("{}/{}", domain, path).trim().to_string())
}

/// Run the heuristics in priority order over hashtag-free text.
pub fn candidate_from_text(content: &str) -> Option<String> {
    if let Some(url) = trailing_url(content) {
        debug!(candidate = %url, "Trailing URL heuristic matched");
        return Some(url);
    }
    if let Some(url) = permashortcitation_url(content) {
        debug!(candidate = %url, "Permashortcitation heuristic matched");
        return Some(url);
    }
    None
}
