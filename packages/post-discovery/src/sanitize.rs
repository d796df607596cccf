//! Text cleanup for URL-like strings pulled out of page content.
//!
//! Everything here is pure and infallible. It only runs over text that is
//! about to be used as a request target, never over whole pages.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use url::Url;

lazy_static! {
    /// Control, format, private-use and unassigned characters, except tab and newline.
    static ref NON_PRINTABLE: Regex = Regex::new(r"[^\P{C}\t\n]+").expect("valid regex");
    /// "Other symbol" characters (emoji, dingbats, ...).
    static ref OTHER_SYMBOL: Regex = Regex::new(r"\p{So}").expect("valid regex");
    static ref LINE_BREAK: Regex = Regex::new(r"\r\n?").expect("valid regex");
}

/// Clean raw bytes, discarding any invalid UTF-8 sequences.
pub fn clean_bytes(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    clean_string(&text)
}

/// Normalize a string before it is used as a URL.
///
/// Non-breaking spaces become spaces, CR/CRLF become LF, non-printable
/// characters are dropped and remaining symbols are rendered as `U+XXXX`.
pub fn clean_string(text: &str) -> String {
    let text = text.replace('\u{a0}', " ");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = NON_PRINTABLE.replace_all(&text, "");

    OTHER_SYMBOL
        .replace_all(&text, |caps: &Captures| {
            caps[0]
                .chars()
                .map(|c| format!("U+{:04X}", c as u32))
                .collect::<String>()
        })
        .into_owned()
}

/// Turn a bare web address (`example.com/post`) into an absolute `http://` URI.
///
/// Anything that already carries a scheme is returned trimmed but otherwise
/// untouched.
pub fn web_address_to_uri(address: &str) -> String {
    let address = address.trim();
    if address.is_empty() || address.contains("://") || address.starts_with("mailto:") {
        return address.to_string();
    }
    format!("http://{}", address)
}

/// Serialize a URL the way the parser and the HTTP client do.
///
/// Lowercases the scheme and host and gives a bare host its `/` path, so
/// URLs written differently on two pages still compare equal. Text that
/// does not parse as a URL is returned unchanged.
pub fn canonical_url(url: &str) -> String {
    Url::parse(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}
