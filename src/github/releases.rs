//! Releases endpoint probing.
//!
//! Lists releases via: GET https://api.github.com/repos/{owner}/{repo}/releases

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::{map_transport, ProbeError};
use crate::search::RepoEntry;

/// Rate-limit quota header consulted on HTTP 403.
const RATELIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Wire shape of one release. Only asset cardinality matters here.
#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    assets: Vec<serde_json::Value>,
}

/// Turn a releases template into a concrete collection URL by stripping
/// the `{/id}` placeholder segment.
pub fn collection_url(releases_url: &str) -> String {
    releases_url.replace("{/id}", "")
}

/// Count the releases that carry at least one asset.
///
/// Returns 0 for a repository whose releases list is empty or whose
/// releases are all asset-less.
pub(crate) async fn count_with_assets(
    client: &Client,
    entry: &RepoEntry,
    timeout: Duration,
) -> Result<usize, ProbeError> {
    let url = collection_url(&entry.releases_url);

    let response = client
        .get(&url)
        .timeout(timeout)
        .send()
        .await
        .map_err(map_transport)?;

    match response.status().as_u16() {
        200 => {
            let releases: Vec<Release> = response.json().await.map_err(map_transport)?;
            Ok(releases.iter().filter(|r| !r.assets.is_empty()).count())
        }
        403 => match response.headers().get(RATELIMIT_REMAINING_HEADER) {
            Some(value) => Err(ProbeError::RateLimited {
                remaining: value.to_str().unwrap_or("?").to_string(),
            }),
            None => Err(ProbeError::Forbidden),
        },
        status => Err(ProbeError::Http(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_strips_placeholder() {
        assert_eq!(
            collection_url("https://api.github.com/repos/a/b/releases{/id}"),
            "https://api.github.com/repos/a/b/releases"
        );
    }

    #[test]
    fn test_collection_url_without_placeholder_is_unchanged() {
        assert_eq!(
            collection_url("https://api.github.com/repos/a/b/releases"),
            "https://api.github.com/repos/a/b/releases"
        );
        assert_eq!(collection_url(""), "");
    }

    #[test]
    fn test_release_assets_default_when_missing() {
        let release: Release = serde_json::from_str(r#"{"tag_name": "v1.0"}"#).unwrap();
        assert!(release.assets.is_empty());

        let release: Release =
            serde_json::from_str(r#"{"assets": [{"name": "relcheck-x86_64.tar.gz"}]}"#).unwrap();
        assert_eq!(release.assets.len(), 1);
    }
}
