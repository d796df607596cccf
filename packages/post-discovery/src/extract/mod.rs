//! Platform heuristic extraction.
//!
//! Each supported platform registers a [`CandidateExtractor`] in an
//! [`ExtractorRegistry`], keyed by [`Platform`]. The registry maps the host
//! of a syndicated copy to its platform and dispatches the page body to the
//! matching extractor.
//!
//! # Usage
//!
//! ```rust,ignore
//! use post_discovery::extract::{ExtractorRegistry, Platform};
//!
//! let registry = ExtractorRegistry::default();
//! let platform = registry.platform_for_url("https://twitter.com/aaronpk/status/1");
//! let candidate = registry.extract_candidate(&platform, &html);
//! ```

pub mod heuristics;
mod twitter;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::parsers::Mf2Parser;
use crate::traits::parser::MetadataParser;

pub use heuristics::{candidate_from_text, permashortcitation_url, strip_hashtags, trailing_url};
pub use twitter::TwitterExtractor;

/// Platform a syndicated copy was published on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Twitter,

    /// A platform provided by an extractor outside this crate
    Named(String),

    /// No registered extractor claims the host
    Unknown,
}

impl Platform {
    pub fn id(&self) -> &str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Named(name) => name,
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A per-platform heuristic producing at most one candidate original URL.
pub trait CandidateExtractor: Send + Sync {
    /// Platform this extractor handles.
    fn platform(&self) -> Platform;

    /// Hosts (exact match) whose pages belong to this platform.
    fn hosts(&self) -> Vec<String>;

    /// Extract a candidate from the raw body of a syndicated copy.
    fn extract_candidate(&self, content: &str) -> Option<String>;
}

/// Registry of platform extractors.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<Platform, Arc<dyn CandidateExtractor>>,
    hosts: HashMap<String, Platform>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::builtin(Arc::new(Mf2Parser::new()))
    }
}

impl ExtractorRegistry {
    /// Registry with every built-in platform, reading markup through `parser`.
    pub fn builtin(parser: Arc<dyn MetadataParser>) -> Self {
        Self::empty().with_extractor(Arc::new(TwitterExtractor::new(parser)))
    }

    /// Registry with no platforms; every lookup yields no candidate.
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
            hosts: HashMap::new(),
        }
    }

    /// Register an extractor, replacing any previous one for its platform.
    ///
    /// The platform's hosts are exactly the new extractor's hosts. A host
    /// already claimed by another platform moves to this one.
    pub fn register(&mut self, extractor: Arc<dyn CandidateExtractor>) {
        let platform = extractor.platform();
        self.hosts.retain(|_, claimed| *claimed != platform);

        for host in extractor.hosts() {
            let host = host.to_ascii_lowercase();
            if let Some(previous) = self.hosts.insert(host.clone(), platform.clone()) {
                warn!(host = %host, from = %previous, to = %platform, "Host reassigned to another platform");
            }
        }
        self.extractors.insert(platform, extractor);
    }

    /// Register an extractor (builder style).
    pub fn with_extractor(mut self, extractor: Arc<dyn CandidateExtractor>) -> Self {
        self.register(extractor);
        self
    }

    /// Platforms with a registered extractor.
    pub fn platforms(&self) -> Vec<Platform> {
        self.extractors.keys().cloned().collect()
    }

    /// Platform of a URL, by exact host match.
    pub fn platform_for_url(&self, url: &str) -> Platform {
        url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .and_then(|host| self.hosts.get(&host).cloned())
            .unwrap_or(Platform::Unknown)
    }

    /// Run the extractor for `platform`, if one is registered.
    pub fn extract_candidate(&self, platform: &Platform, content: &str) -> Option<String> {
        let Some(extractor) = self.extractors.get(platform) else {
            debug!(platform = %platform, "No extractor for platform");
            return None;
        };
        let candidate = extractor.extract_candidate(content);
        debug!(platform = %platform, candidate = ?candidate, "Candidate extraction finished");
        candidate
    }
}

/// Extract a candidate using the built-in extractors.
pub fn extract_candidate(platform: &Platform, content: &str) -> Option<String> {
    ExtractorRegistry::default().extract_candidate(platform, content)
}
