//! Microformats2 parser built on `scraper`.
//!
//! Covers the parts of mf2 the resolution engine relies on: `h-*` roots,
//! `p-`/`u-`/`dt-`/`e-` properties, nested roots, implied `name` and `url`,
//! and page-level `rel` links. Value-class parsing and backcompat classes
//! are not supported.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::extract::Platform;
use crate::parsers::twitter;
use crate::traits::parser::MetadataParser;
use crate::types::document::{Entry, PropertyValue, StructuredDocument};

lazy_static! {
    static ref REL_LINKS: Selector =
        Selector::parse("a[rel][href], link[rel][href], area[rel][href]").expect("valid selector");
    static ref BASE: Selector = Selector::parse("base[href]").expect("valid selector");
}

/// Default [`MetadataParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Mf2Parser;

impl Mf2Parser {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataParser for Mf2Parser {
    fn parse(&self, html: &str, base_url: &str) -> StructuredDocument {
        let document = Html::parse_document(html);
        let ctx = Context::new(&document, base_url);

        let mut doc = StructuredDocument::new(base_url);
        collect_roots(&ctx, document.root_element(), &mut doc.items);

        for link in document.select(&REL_LINKS) {
            let (Some(rel), Some(href)) = (link.value().attr("rel"), link.value().attr("href"))
            else {
                continue;
            };
            let url = ctx.resolve(href);
            for rel in rel.split_whitespace() {
                doc.add_rel(rel.to_ascii_lowercase(), url.clone());
            }
        }

        doc
    }

    fn parse_platform_markup(&self, platform: &Platform, html: &str) -> Vec<Entry> {
        match platform {
            Platform::Twitter => twitter::parse_twitter(html),
            _ => Vec::new(),
        }
    }
}

struct Context {
    base: Option<Url>,
}

impl Context {
    fn new(document: &Html, base_url: &str) -> Self {
        let page_base = Url::parse(base_url).ok();
        // <base href> may itself be relative to the page URL
        let base = document
            .select(&BASE)
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(|href| match &page_base {
                Some(page) => page.join(href).ok(),
                None => Url::parse(href).ok(),
            })
            .or(page_base);
        Self { base }
    }

    fn resolve(&self, href: &str) -> String {
        let href = href.trim();
        self.base
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| href.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    P,
    U,
    Dt,
    E,
}

fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

fn is_mf2_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn root_types(el: ElementRef<'_>) -> Vec<String> {
    let mut types: Vec<String> = el
        .value()
        .classes()
        .filter(|class| class.strip_prefix("h-").is_some_and(is_mf2_name))
        .map(str::to_string)
        .collect();
    types.sort();
    types.dedup();
    types
}

fn property_classes(el: ElementRef<'_>) -> Vec<(Prefix, String)> {
    el.value()
        .classes()
        .filter_map(|class| {
            let (prefix, name) = class.split_once('-')?;
            let prefix = match prefix {
                "p" => Prefix::P,
                "u" => Prefix::U,
                "dt" => Prefix::Dt,
                "e" => Prefix::E,
                _ => return None,
            };
            is_mf2_name(name).then(|| (prefix, name.to_string()))
        })
        .collect()
}

fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

fn property_value(ctx: &Context, el: ElementRef<'_>, prefix: Prefix) -> String {
    let tag = el.value().name();
    match prefix {
        Prefix::P => match tag {
            "img" | "area" => attr(el, "alt").map(str::to_string),
            "abbr" | "link" => attr(el, "title").map(str::to_string),
            "data" | "input" => attr(el, "value").map(str::to_string),
            _ => None,
        }
        .unwrap_or_else(|| text_content(el)),
        Prefix::U => match tag {
            "a" | "area" | "link" => attr(el, "href").map(|h| ctx.resolve(h)),
            "img" | "audio" | "video" | "source" | "iframe" => attr(el, "src").map(|s| ctx.resolve(s)),
            "object" => attr(el, "data").map(|d| ctx.resolve(d)),
            "abbr" => attr(el, "title").map(str::to_string),
            "data" | "input" => attr(el, "value").map(str::to_string),
            _ => None,
        }
        .unwrap_or_else(|| text_content(el)),
        Prefix::Dt => match tag {
            "time" | "ins" | "del" => attr(el, "datetime").map(str::to_string),
            "abbr" => attr(el, "title").map(str::to_string),
            "data" | "input" => attr(el, "value").map(str::to_string),
            _ => None,
        }
        .unwrap_or_else(|| text_content(el)),
        Prefix::E => text_content(el),
    }
}

fn collect_roots(ctx: &Context, el: ElementRef<'_>, out: &mut Vec<Entry>) {
    for child in child_elements(el) {
        if root_types(child).is_empty() {
            collect_roots(ctx, child, out);
        } else {
            out.push(parse_entry(ctx, child));
        }
    }
}

fn parse_entry(ctx: &Context, el: ElementRef<'_>) -> Entry {
    let mut entry = Entry {
        types: root_types(el),
        ..Default::default()
    };
    let mut explicit = Explicit::default();
    parse_properties(ctx, el, &mut entry, &mut explicit);
    imply_properties(ctx, el, &mut entry, &explicit);
    entry
}

/// Which explicit property kinds were seen, for implied-property rules.
#[derive(Default)]
struct Explicit {
    text: bool,
    nested: bool,
}

fn parse_properties(ctx: &Context, el: ElementRef<'_>, entry: &mut Entry, explicit: &mut Explicit) {
    for child in child_elements(el) {
        let props = property_classes(child);

        if !root_types(child).is_empty() {
            explicit.nested = true;
            let nested = parse_entry(ctx, child);
            if props.is_empty() {
                entry.children.push(nested);
                continue;
            }
            for (prefix, name) in props {
                explicit.text |= matches!(prefix, Prefix::P | Prefix::E);
                let value = match prefix {
                    Prefix::U => nested.plaintext("url").map(str::to_string),
                    Prefix::P | Prefix::E => nested.plaintext("name").map(str::to_string),
                    Prefix::Dt => None,
                }
                .unwrap_or_else(|| property_value(ctx, child, prefix));
                entry.add_property(name, nested.clone().with_value(value));
            }
            continue;
        }

        for (prefix, name) in props {
            explicit.text |= matches!(prefix, Prefix::P | Prefix::E);
            entry.add_property(name, PropertyValue::Text(property_value(ctx, child, prefix)));
        }
        parse_properties(ctx, child, entry, explicit);
    }
}

fn imply_properties(ctx: &Context, el: ElementRef<'_>, entry: &mut Entry, explicit: &Explicit) {
    let tag = el.value().name();

    if !entry.has_property("name") && !explicit.text && !explicit.nested {
        let name = match tag {
            "img" | "area" => attr(el, "alt").map(str::to_string),
            "abbr" => attr(el, "title").map(str::to_string),
            _ => None,
        }
        .unwrap_or_else(|| text_content(el));
        if !name.is_empty() {
            entry.add_property("name", name);
        }
    }

    if !entry.has_property("url") {
        let href = match tag {
            "a" | "area" => attr(el, "href"),
            _ => {
                let mut links = child_elements(el)
                    .filter(|c| c.value().name() == "a" && root_types(*c).is_empty())
                    .filter_map(|c| attr(c, "href"));
                match (links.next(), links.next()) {
                    (Some(only), None) => Some(only),
                    _ => None,
                }
            }
        };
        if let Some(href) = href {
            entry.add_property("url", ctx.resolve(href));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = r#"
        <html>
        <head>
            <link rel="syndication" href="https://twitter.com/barnaby/status/1">
            <link rel="me authorization_endpoint" href="/auth">
        </head>
        <body>
            <article class="h-entry">
                <h1 class="p-name">Soup</h1>
                <div class="e-content">ha ha ha <b>soup</b></div>
                <a class="u-url" href="/notes/4U5Ejy/">permalink</a>
                <time class="dt-published" datetime="2014-01-15T10:00:00Z">Jan 15</time>
                <a class="u-syndication" href="https://twitter.com/barnaby/status/2">tweet</a>
                <div class="p-author h-card">
                    <a class="p-name u-url" href="http://waterpigs.co.uk/">Barnaby Walters</a>
                </div>
                <div class="h-cite">
                    <a class="u-syndication" href="http://t.co/reply">reply</a>
                </div>
            </article>
            <a rel="syndication" href="https://twitter.com/barnaby/status/1">dup</a>
        </body>
        </html>
    "#;

    fn parse_post() -> StructuredDocument {
        Mf2Parser::new().parse(POST, "http://waterpigs.co.uk/notes/4U5Ejy/")
    }

    #[test]
    fn test_parses_rels() {
        let doc = parse_post();
        assert_eq!(
            doc.rel_urls("syndication"),
            &["https://twitter.com/barnaby/status/1"]
        );
        assert_eq!(doc.rel_urls("me"), &["http://waterpigs.co.uk/auth"]);
        assert_eq!(
            doc.rel_urls("authorization_endpoint"),
            &["http://waterpigs.co.uk/auth"]
        );
    }

    #[test]
    fn test_parses_entry_properties() {
        let doc = parse_post();
        assert_eq!(doc.items.len(), 1);

        let entry = &doc.items[0];
        assert!(entry.has_type("h-entry"));
        assert_eq!(entry.plaintext("name"), Some("Soup"));
        assert_eq!(entry.plaintext("content"), Some("ha ha ha soup"));
        assert_eq!(entry.plaintext("url"), Some("http://waterpigs.co.uk/notes/4U5Ejy/"));
        assert_eq!(entry.plaintext("published"), Some("2014-01-15T10:00:00Z"));
        assert_eq!(
            entry.plaintext("syndication"),
            Some("https://twitter.com/barnaby/status/2")
        );
    }

    #[test]
    fn test_nested_property_and_child_entries() {
        let doc = parse_post();
        let entry = &doc.items[0];

        let author = entry.property("author")[0].as_entry().unwrap();
        assert!(author.has_type("h-card"));
        assert_eq!(author.plaintext("url"), Some("http://waterpigs.co.uk/"));
        assert_eq!(entry.plaintext("author"), Some("Barnaby Walters"));

        assert_eq!(entry.children.len(), 1);
        assert!(entry.children[0].has_type("h-cite"));
        assert_eq!(
            doc.find_entries_by_property_value("syndication", "http://t.co/reply")
                .len(),
            1
        );
    }

    #[test]
    fn test_implied_name_and_url() {
        let html = r#"<a class="h-card" href="/me">Tantek</a>
                      <div class="h-card"><a href="http://ttk.me/">ttk</a></div>"#;
        let doc = Mf2Parser::new().parse(html, "http://tantek.com/");

        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].plaintext("name"), Some("Tantek"));
        assert_eq!(doc.items[0].plaintext("url"), Some("http://tantek.com/me"));
        assert_eq!(doc.items[1].plaintext("url"), Some("http://ttk.me/"));
    }

    #[test]
    fn test_base_element_changes_resolution() {
        let html = r#"<head><base href="/blog/"></head>
                      <body><a rel="syndication" href="post-1">x</a></body>"#;
        let doc = Mf2Parser::new().parse(html, "http://example.com/index.html");
        assert_eq!(doc.rel_urls("syndication"), &["http://example.com/blog/post-1"]);
    }

    #[test]
    fn test_garbage_input_yields_empty_document() {
        let doc = Mf2Parser::new().parse("\u{0}<<<>>>not html", "not a url");
        assert!(doc.items.is_empty());
        assert!(doc.rels.is_empty());
        assert_eq!(doc.effective_url, "not a url");
    }

    #[test]
    fn test_no_shim_for_unknown_platforms() {
        let entries = Mf2Parser::new().parse_platform_markup(&Platform::Unknown, POST);
        assert!(entries.is_empty());
    }
}
