//! Fetcher trait and URL validation for SSRF protection.
//!
//! Candidate URLs are pulled out of third-party content, so every URL-based
//! fetcher should be wrapped in [`ValidatedFetcher`] in production:
//!
//! ```rust,ignore
//! let fetcher = ValidatedFetcher::new(HttpFetcher::new(&config)?);
//! let page = fetcher.fetch("https://example.com/post").await?;
//! ```

use async_trait::async_trait;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use crate::error::{FetchError, FetchResult, SecurityError, SecurityResult};
use crate::types::page::FetchedPage;

/// HTTP transport used by the resolution engine.
///
/// Implementations must follow redirects and report the final URL in
/// [`FetchedPage::effective_url`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a single URL.
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        (**self).fetch(url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// URL validator for SSRF protection.
///
/// Validates URLs before fetching to prevent:
/// - Access to internal services (localhost, 127.0.0.1)
/// - Access to private IP ranges (10.x, 172.16.x, 192.168.x)
/// - Access to cloud metadata services (169.254.x)
/// - Non-HTTP(S) schemes (file://, ftp://)
#[derive(Debug, Clone)]
pub struct UrlValidator {
    /// Allowed URL schemes
    allowed_schemes: HashSet<String>,

    /// Blocked hostnames
    blocked_hosts: HashSet<String>,

    /// Blocked CIDR ranges
    blocked_cidrs: Vec<ipnet::IpNet>,

    /// Additional allowed hosts (bypass normal validation)
    allowed_hosts: HashSet<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    /// Create a new URL validator with default security rules.
    pub fn new() -> Self {
        let blocked_cidrs = [
            "10.0.0.0/8",
            "172.16.0.0/12",
            "192.168.0.0/16",
            "169.254.0.0/16", // Link-local / cloud metadata
            "127.0.0.0/8",    // Loopback
            "::1/128",        // IPv6 loopback
            "fc00::/7",       // IPv6 private
            "fe80::/10",      // IPv6 link-local
        ]
        .into_iter()
        .filter_map(|cidr| cidr.parse().ok())
        .collect();

        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: [
                "localhost",
                "127.0.0.1",
                "::1",
                "[::1]",
                "0.0.0.0",
                "metadata.google.internal",
                "metadata.gke.internal",
                "instance-data",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            blocked_cidrs,
            allowed_hosts: HashSet::new(),
        }
    }

    /// Add an allowed host (bypasses validation).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into());
        self
    }

    fn check_ip(&self, ip: IpAddr) -> SecurityResult<()> {
        match self.blocked_cidrs.iter().find(|cidr| cidr.contains(&ip)) {
            Some(_) => Err(SecurityError::BlockedCidr(ip.to_string())),
            None => Ok(()),
        }
    }

    /// Validate a URL for safety.
    pub fn validate(&self, url: &str) -> SecurityResult<()> {
        let parsed = url::Url::parse(url)?;

        if !self.allowed_schemes.contains(parsed.scheme()) {
            return Err(SecurityError::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        if self.blocked_hosts.contains(host) {
            return Err(SecurityError::BlockedHost(host.to_string()));
        }

        match parsed.host() {
            Some(url::Host::Ipv4(ip)) => self.check_ip(IpAddr::V4(ip)),
            Some(url::Host::Ipv6(ip)) => self.check_ip(IpAddr::V6(ip)),
            _ => Ok(()),
        }
    }

    /// Validate a URL and resolve DNS to check the actual IP.
    ///
    /// This catches DNS rebinding attacks where a hostname resolves
    /// to an internal IP.
    pub async fn validate_with_dns(&self, url: &str) -> SecurityResult<()> {
        self.validate(url)?;

        let parsed = url::Url::parse(url)?;
        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        // IP literals were already checked in validate()
        if !matches!(parsed.host(), Some(url::Host::Domain(_))) {
            return Ok(());
        }

        let port = parsed.port_or_known_default().unwrap_or(80);
        let addrs = tokio::net::lookup_host(format!("{}:{}", host, port))
            .await
            .map_err(|e| SecurityError::DnsResolution(e.to_string()))?;

        for addr in addrs {
            self.check_ip(addr.ip()).map_err(|_| {
                SecurityError::BlockedCidr(format!(
                    "DNS for {} resolved to blocked IP {}",
                    host,
                    addr.ip()
                ))
            })?;
        }

        Ok(())
    }
}

/// A fetcher that validates URLs before fetching (SSRF protection).
///
/// The effective URL is checked too, so a redirect into a private range is
/// rejected after the fact.
pub struct ValidatedFetcher<F: Fetcher> {
    inner: F,
    validator: UrlValidator,
    resolve_dns: bool,
}

impl<F: Fetcher> ValidatedFetcher<F> {
    /// Create a new validated fetcher with default security rules.
    pub fn new(fetcher: F) -> Self {
        Self {
            inner: fetcher,
            validator: UrlValidator::new(),
            resolve_dns: true,
        }
    }

    /// Create with a custom validator.
    pub fn with_validator(fetcher: F, validator: UrlValidator) -> Self {
        Self {
            inner: fetcher,
            validator,
            resolve_dns: true,
        }
    }

    /// Skip the DNS lookup and only check the URL text.
    pub fn without_dns(mut self) -> Self {
        self.resolve_dns = false;
        self
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for ValidatedFetcher<F> {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        if self.resolve_dns {
            self.validator.validate_with_dns(url).await?;
        } else {
            self.validator.validate(url)?;
        }

        let page = self.inner.fetch(url).await?;

        if let Err(e) = self.validator.validate(&page.effective_url) {
            tracing::warn!(
                url = %url,
                effective_url = %page.effective_url,
                error = %e,
                "Redirected to blocked URL"
            );
            return Err(FetchError::Security(e));
        }

        Ok(page)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
