//! CLI for resolving original posts
//!
//! Prints one JSON object per input URL on stdout. Logs go to stderr.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use post_discovery::{
    DiscoveryConfig, ErrorKind, Fetcher, HttpFetcher, OriginalPostDiscovery, Resolution,
    ResolutionMethod, ValidatedFetcher,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "discover-original")]
#[command(about = "Find the original post behind syndicated copies")]
struct Cli {
    /// Syndicated copy URLs to resolve
    #[arg(required = true)]
    urls: Vec<String>,

    /// Allow fetching private and loopback addresses
    #[arg(long)]
    no_validate: bool,

    /// Per-fetch timeout in seconds (overrides DISCOVERY_FETCH_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS")]
    fetch_timeout: Option<u64>,

    /// Fallback scan concurrency (overrides DISCOVERY_MAX_CONCURRENT_FETCHES)
    #[arg(long, value_name = "N")]
    max_concurrent: Option<usize>,
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct Output {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<ResolutionMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Output {
    fn resolved(url: String, resolution: Resolution) -> Self {
        Self {
            url,
            original_url: Some(resolution.original_url),
            method: Some(resolution.method),
            fallback_reason: resolution.fallback_reason,
            error: None,
        }
    }

    fn failed(url: String, error: String) -> Self {
        Self {
            url,
            original_url: None,
            method: None,
            fallback_reason: None,
            error: Some(error),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,post_discovery=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let mut config = DiscoveryConfig::from_env().context("Failed to load configuration")?;
    if let Some(secs) = cli.fetch_timeout {
        config = config.with_fetch_timeout(Duration::from_secs(secs));
    }
    if let Some(n) = cli.max_concurrent {
        config = config.with_max_concurrent_fetches(n);
    }

    let http = HttpFetcher::new(&config).context("Failed to build HTTP client")?;
    let fetcher: Arc<dyn Fetcher> = if cli.no_validate {
        tracing::warn!("URL validation disabled");
        Arc::new(http)
    } else {
        Arc::new(ValidatedFetcher::new(http))
    };

    let discovery = OriginalPostDiscovery::new(fetcher).with_config(config);

    let mut failed = false;
    for url in cli.urls {
        let output = match discovery.resolve(&url).await {
            Ok(resolution) => Output::resolved(url, resolution),
            Err(e) => {
                failed = true;
                Output::failed(url, e.to_string())
            }
        };
        println!(
            "{}",
            serde_json::to_string(&output).context("Failed to serialize output")?
        );
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
