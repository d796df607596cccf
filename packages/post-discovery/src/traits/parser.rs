//! Structured-metadata parser trait.

use crate::extract::Platform;
use crate::types::document::{Entry, StructuredDocument};

/// Turns HTML into a property graph.
///
/// Parsing never fails: malformed markup yields an empty or partial
/// document.
pub trait MetadataParser: Send + Sync {
    /// Parse a page, resolving relative URLs against `base_url`.
    fn parse(&self, html: &str, base_url: &str) -> StructuredDocument;

    /// Parse markup of a platform that does not publish microformats itself.
    ///
    /// Returns the entries a shim can recover, empty for platforms without a
    /// shim.
    fn parse_platform_markup(&self, platform: &Platform, html: &str) -> Vec<Entry>;
}
