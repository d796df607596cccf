//! Structured-metadata parser implementations.
//!
//! - `Mf2Parser` - microformats2 over `scraper`
//! - `twitter` - shim turning tweet markup into an `h-entry`

mod mf2;
pub mod twitter;

pub use mf2::Mf2Parser;

// Re-export from traits for convenience
pub use crate::traits::parser::MetadataParser;
