//! Resolution types - the input and output of one discovery call.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::extract::Platform;

/// The syndicated copy being resolved.
///
/// Built once per call and dropped after candidate extraction.
#[derive(Debug, Clone)]
pub struct SyndicatedCopy {
    /// Normalized URL of the copy
    pub source_url: String,

    /// Platform the copy lives on
    pub platform: Platform,

    /// Raw response body
    pub raw_content: String,
}

impl SyndicatedCopy {
    pub fn new(
        source_url: impl Into<String>,
        platform: Platform,
        raw_content: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            platform,
            raw_content: raw_content.into(),
        }
    }
}

/// How the original URL was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    /// A candidate was fetched and links back to the syndicated copy
    Verified,

    /// No better original could be proven; the input URL is returned
    SelfFallback,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// URL of the original post, never empty
    pub original_url: String,

    pub method: ResolutionMethod,

    /// Why verification failed, for self-fallbacks after a candidate was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<ErrorKind>,
}

impl Resolution {
    /// A verified original post.
    pub fn verified(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            method: ResolutionMethod::Verified,
            fallback_reason: None,
        }
    }

    /// Fall back to the input URL itself.
    pub fn self_fallback(url: impl Into<String>, reason: Option<ErrorKind>) -> Self {
        Self {
            original_url: url.into(),
            method: ResolutionMethod::SelfFallback,
            fallback_reason: reason,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.method == ResolutionMethod::Verified
    }
}

/// Outcome of a resolution call: exactly one of a URL or an error.
pub type ResolutionResult = crate::error::DiscoveryResult<Resolution>;
