//! Data types shared across the resolution engine.

pub mod config;
pub mod document;
pub mod page;
pub mod resolution;
