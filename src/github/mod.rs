//! GitHub API client module for probing repositories.
//!
//! Provides an async client for checking whether repositories publish
//! release artifacts:
//! - releases endpoint (does the repository have releases with assets?)
//! - languages endpoint (per-language byte and line estimates)
//! - rate_limit endpoint (remaining request quota)

mod languages;
mod rate_limit;
mod releases;

pub use languages::{estimate_lines, LanguageStat, BYTES_PER_LINE};
pub use rate_limit::RateLimitStatus;
pub use releases::collection_url;

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use thiserror::Error;

use crate::search::RepoEntry;

/// Per-request timeout for every call the client makes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while probing one repository.
///
/// All of these are per-repository outcomes; none abort the batch.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("rate limited (remaining: {remaining})")]
    RateLimited { remaining: String },
    #[error("HTTP 403 (possibly a private repository)")]
    Forbidden,
    #[error("HTTP {0}")]
    Http(u16),
}

/// Result of probing one repository's releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// At least one release with assets exists
    Found(ReleaseHit),
    /// The releases list is empty, or no release carries assets
    NoReleases,
}

/// A repository confirmed to publish release artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseHit {
    pub name: String,
    pub repo_url: String,
    pub description: String,
    pub language: Option<String>,
    pub languages_url: Option<String>,
    /// Per-language byte/line breakdown; empty when the secondary lookup
    /// fails or the entry has no languages endpoint.
    pub languages: BTreeMap<String, LanguageStat>,
    /// Count of releases that carry at least one asset, not total releases.
    pub release_count: usize,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
}

/// GitHub API client shared read-only across all concurrent probes.
pub struct GithubClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl GithubClient {
    /// Create a new client, attaching the token as a bearer credential
    /// when present.
    pub fn new(token: Option<&str>) -> Self {
        Self::with_timeout(token, REQUEST_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(token: Option<&str>, timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(tok) = token {
            if let Ok(value) = HeaderValue::from_str(&format!("token {}", tok)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("relcheck/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .expect("failed to create HTTP client");

        Self { http, timeout }
    }

    /// Probe one repository: list its releases and, when releases with
    /// assets exist, fetch the language breakdown.
    ///
    /// Single-shot - no retry on any classification. A failure of the
    /// secondary languages call degrades the breakdown to empty without
    /// failing the probe.
    pub async fn probe(&self, entry: &RepoEntry) -> Result<ProbeOutcome, ProbeError> {
        let count = releases::count_with_assets(&self.http, entry, self.timeout).await?;
        if count == 0 {
            return Ok(ProbeOutcome::NoReleases);
        }

        let languages = match &entry.languages_url {
            Some(url) => match languages::fetch(&self.http, url, self.timeout).await {
                Ok(map) => map,
                Err(e) => {
                    if std::env::var("RELCHECK_DEBUG").is_ok() {
                        eprintln!("[debug] language lookup failed for {}: {}", entry.full_name, e);
                    }
                    BTreeMap::new()
                }
            },
            None => BTreeMap::new(),
        };

        Ok(ProbeOutcome::Found(ReleaseHit {
            name: entry.full_name.clone(),
            repo_url: entry.html_url.clone(),
            description: entry.description.clone(),
            language: entry.language.clone(),
            languages_url: entry.languages_url.clone(),
            languages,
            release_count: count,
            created_at: entry.created_at.clone(),
            updated_at: entry.updated_at.clone(),
            pushed_at: entry.pushed_at.clone(),
        }))
    }

    /// Query the API's rate-limit status for the current credential.
    pub async fn rate_limit(&self) -> Result<RateLimitStatus, ProbeError> {
        rate_limit::fetch(&self.http, self.timeout).await
    }
}

/// Map a reqwest error to the probe taxonomy.
pub(crate) fn map_transport(e: reqwest::Error) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Timeout
    } else {
        ProbeError::Network(e)
    }
}
