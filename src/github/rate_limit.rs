//! Rate-limit status lookup.
//!
//! Queries the core quota via: GET https://api.github.com/rate_limit

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde::Deserialize;

use super::{map_transport, ProbeError};

const RATE_LIMIT_URL: &str = "https://api.github.com/rate_limit";

/// Core quota status for the current credential.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitStatus {
    pub limit: u64,
    pub remaining: u64,
    /// Unix timestamp (seconds) at which the quota resets.
    pub reset: u64,
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    rate: RateLimitStatus,
}

impl RateLimitStatus {
    /// Whole minutes until the quota resets, measured from now.
    pub fn minutes_until_reset(&self) -> u64 {
        self.minutes_until_reset_at(current_timestamp())
    }

    /// Whole minutes from `now` (Unix seconds) until the reset timestamp.
    pub fn minutes_until_reset_at(&self, now: u64) -> u64 {
        self.reset.saturating_sub(now) / 60
    }

    /// True when no requests remain in the current window.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Get current Unix timestamp in seconds.
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

/// Fetch the current rate-limit status.
pub(crate) async fn fetch(
    client: &Client,
    timeout: Duration,
) -> Result<RateLimitStatus, ProbeError> {
    let response = client
        .get(RATE_LIMIT_URL)
        .timeout(timeout)
        .send()
        .await
        .map_err(map_transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProbeError::Http(status.as_u16()));
    }

    let body: RateLimitResponse = response.json().await.map_err(map_transport)?;
    Ok(body.rate)
}
