//! Core trait abstractions for the resolution engine.
//!
//! These traits define the collaborators the engine talks to: the HTTP
//! transport and the structured-metadata parser.

pub mod fetcher;
pub mod parser;
