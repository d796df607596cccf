//! Structured metadata types - the property graph a parser builds from HTML.
//!
//! The shapes follow microformats2: a document holds a list of root items
//! (`h-*` entries) plus page-level `rel` links. Entries carry named
//! properties whose values are either plain strings or nested entries.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A single value of an entry property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Plain text or URL
    Text(String),

    /// Nested entry (e.g. an `h-card` author)
    Entry(Box<Entry>),
}

impl PropertyValue {
    /// Plain text of this value. Nested entries use their `value`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Entry(entry) => entry.value.as_deref(),
        }
    }

    /// The nested entry, if this value is one.
    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            PropertyValue::Entry(entry) => Some(entry),
            PropertyValue::Text(_) => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<Entry> for PropertyValue {
    fn from(entry: Entry) -> Self {
        PropertyValue::Entry(Box::new(entry))
    }
}

/// A typed node in the property graph (`h-entry`, `h-card`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Root class names, e.g. `["h-entry"]`
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Named properties in document order
    #[serde(default)]
    pub properties: IndexMap<String, Vec<PropertyValue>>,

    /// Textual value when this entry is itself a property value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Root entries nested without a property name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Entry>,
}

impl Entry {
    /// Create an entry of one type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            types: vec![kind.into()],
            ..Default::default()
        }
    }

    /// Append a property value (builder style).
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.add_property(name, value);
        self
    }

    /// Add a nested child entry (builder style).
    pub fn with_child(mut self, child: Entry) -> Self {
        self.children.push(child);
        self
    }

    /// Set the textual value (builder style).
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Append a property value.
    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties
            .get(name)
            .map(|values| !values.is_empty())
            .unwrap_or(false)
    }

    /// All values of a property.
    pub fn property(&self, name: &str) -> &[PropertyValue] {
        self.properties
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Plain text of the first value of a property.
    pub fn plaintext(&self, name: &str) -> Option<&str> {
        self.property(name).iter().find_map(PropertyValue::as_text)
    }

    /// Plain text of every value of a property.
    pub fn plaintext_values(&self, name: &str) -> Vec<&str> {
        self.property(name)
            .iter()
            .filter_map(PropertyValue::as_text)
            .collect()
    }

    /// Entries nested directly under this one, through properties or children.
    fn nested(&self) -> impl Iterator<Item = &Entry> {
        self.properties
            .values()
            .flatten()
            .filter_map(PropertyValue::as_entry)
            .chain(self.children.iter())
    }
}

/// Depth-first search over a forest of entries.
pub fn find_entries<'a, F>(items: &'a [Entry], predicate: F) -> Vec<&'a Entry>
where
    F: Fn(&Entry) -> bool,
{
    fn walk<'a, F: Fn(&Entry) -> bool>(entry: &'a Entry, predicate: &F, out: &mut Vec<&'a Entry>) {
        if predicate(entry) {
            out.push(entry);
        }
        for nested in entry.nested() {
            walk(nested, predicate, out);
        }
    }

    let mut found = Vec::new();
    for item in items {
        walk(item, &predicate, &mut found);
    }
    found
}

/// Parsed structured metadata for one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// URL the document was parsed against (post-redirect)
    pub effective_url: String,

    /// Content type the document was served with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Root entries
    pub items: Vec<Entry>,

    /// Page-level relations: rel name → unique URLs in document order
    pub rels: IndexMap<String, Vec<String>>,
}

impl StructuredDocument {
    pub fn new(effective_url: impl Into<String>) -> Self {
        Self {
            effective_url: effective_url.into(),
            ..Default::default()
        }
    }

    /// Record a rel link, ignoring duplicates.
    pub fn add_rel(&mut self, rel: impl Into<String>, url: impl Into<String>) {
        let urls = self.rels.entry(rel.into()).or_default();
        let url = url.into();
        if !urls.contains(&url) {
            urls.push(url);
        }
    }

    /// URLs declared for a relation, empty when none.
    pub fn rel_urls(&self, rel: &str) -> &[String] {
        self.rels.get(rel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every entry in the graph matching `predicate`, depth first.
    pub fn find_entries<F>(&self, predicate: F) -> Vec<&Entry>
    where
        F: Fn(&Entry) -> bool,
    {
        find_entries(&self.items, predicate)
    }

    pub fn find_entries_by_type(&self, kind: &str) -> Vec<&Entry> {
        self.find_entries(|e| e.has_type(kind))
    }

    /// Entries with a property value whose text equals `value` exactly.
    pub fn find_entries_by_property_value(&self, name: &str, value: &str) -> Vec<&Entry> {
        self.find_entries(|e| e.plaintext_values(name).contains(&value))
    }

    /// Union of the page-level relation and every entry property of the same
    /// name, de-duplicated. Relation URLs come first.
    pub fn collect_links(&self, name: &str) -> Vec<String> {
        let mut links: IndexSet<String> = self.rel_urls(name).iter().cloned().collect();
        for entry in self.find_entries(|e| e.has_property(name)) {
            links.extend(entry.plaintext_values(name).into_iter().map(str::to_string));
        }
        links.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StructuredDocument {
        let author = Entry::new("h-card")
            .with_property("name", "Barnaby")
            .with_value("Barnaby");
        let reply = Entry::new("h-cite").with_property("syndication", "https://twitter.com/x/status/2");
        let post = Entry::new("h-entry")
            .with_property("author", author)
            .with_property("syndication", "https://twitter.com/x/status/1")
            .with_child(reply);

        let mut doc = StructuredDocument::new("http://example.com/post");
        doc.items.push(post);
        doc.add_rel("syndication", "https://twitter.com/x/status/1");
        doc.add_rel("syndication", "https://twitter.com/x/status/1");
        doc.add_rel("syndication", "http://t.co/short");
        doc
    }

    #[test]
    fn test_add_rel_deduplicates() {
        let doc = sample();
        assert_eq!(
            doc.rel_urls("syndication"),
            &["https://twitter.com/x/status/1", "http://t.co/short"]
        );
        assert!(doc.rel_urls("me").is_empty());
    }

    #[test]
    fn test_find_entries_recurses_into_properties_and_children() {
        let doc = sample();
        assert_eq!(doc.find_entries_by_type("h-card").len(), 1);
        assert_eq!(doc.find_entries_by_type("h-cite").len(), 1);
        assert_eq!(doc.find_entries(|e| e.has_property("syndication")).len(), 2);
    }

    #[test]
    fn test_find_by_property_value_is_exact() {
        let doc = sample();
        assert_eq!(
            doc.find_entries_by_property_value("syndication", "https://twitter.com/x/status/2")
                .len(),
            1
        );
        assert!(doc
            .find_entries_by_property_value("syndication", "https://twitter.com/x/status")
            .is_empty());
    }

    #[test]
    fn test_collect_links_unions_rels_and_properties() {
        let doc = sample();
        assert_eq!(
            doc.collect_links("syndication"),
            vec![
                "https://twitter.com/x/status/1".to_string(),
                "http://t.co/short".to_string(),
                "https://twitter.com/x/status/2".to_string(),
            ]
        );
    }

    #[test]
    fn test_plaintext_of_nested_entry_uses_value() {
        let doc = sample();
        let post = &doc.items[0];
        assert_eq!(post.plaintext("author"), Some("Barnaby"));
        assert_eq!(post.plaintext("missing"), None);
    }
}
