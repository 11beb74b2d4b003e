//! Languages endpoint lookup.
//!
//! Fetches the per-language byte counts via the entry's `languages_url`
//! and derives a rough line estimate per language.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{map_transport, ProbeError};

/// Fixed divisor for deriving line estimates from byte counts.
pub const BYTES_PER_LINE: f64 = 35.0;

/// Byte count plus derived line estimate for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub bytes: u64,
    pub lines: u64,
}

/// Estimate the line count for a language from its byte count.
pub fn estimate_lines(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_LINE).round() as u64
}

/// Fetch the language breakdown for a repository.
pub(crate) async fn fetch(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<BTreeMap<String, LanguageStat>, ProbeError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(map_transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProbeError::Http(status.as_u16()));
    }

    let raw: BTreeMap<String, u64> = response.json().await.map_err(map_transport)?;
    Ok(raw
        .into_iter()
        .map(|(name, bytes)| {
            let lines = estimate_lines(bytes);
            (name, LanguageStat { bytes, lines })
        })
        .collect())
}
