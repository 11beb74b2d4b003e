//! Integration tests for the repository prober.
//!
//! These run against a local mock of the GitHub API and validate the
//! tolerant response classification.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relcheck::github::{GithubClient, ProbeError, ProbeOutcome};
use relcheck::search::RepoEntry;

fn entry_for(server: &MockServer, name: &str, languages: bool) -> RepoEntry {
    RepoEntry {
        full_name: name.to_string(),
        html_url: format!("https://github.com/{}", name),
        releases_url: format!("{}/repos/{}/releases{{/id}}", server.uri(), name),
        description: String::new(),
        language: None,
        languages_url: if languages {
            Some(format!("{}/repos/{}/languages", server.uri(), name))
        } else {
            None
        },
        created_at: Some("2020-01-01T00:00:00Z".to_string()),
        updated_at: None,
        pushed_at: None,
    }
}

#[tokio::test]
async fn probe_counts_only_releases_with_assets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tag_name": "v3.0", "assets": [{"name": "v3.tar.gz"}]},
            {"tag_name": "v2.0", "assets": []},
            {"tag_name": "v1.0", "assets": [{"name": "v1.tar.gz"}, {"name": "v1.zip"}]}
        ])))
        .mount(&server)
        .await;

    let client = GithubClient::new(None);
    let outcome = client.probe(&entry_for(&server, "a/b", false)).await.unwrap();

    match outcome {
        ProbeOutcome::Found(hit) => {
            // Two of three releases carry assets.
            assert_eq!(hit.release_count, 2);
            assert_eq!(hit.name, "a/b");
            assert_eq!(hit.created_at.as_deref(), Some("2020-01-01T00:00:00Z"));
            assert!(hit.languages.is_empty());
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn probe_empty_release_list_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = GithubClient::new(None);
    let outcome = client.probe(&entry_for(&server, "a/b", false)).await.unwrap();
    assert_eq!(outcome, ProbeOutcome::NoReleases);
}

#[tokio::test]
async fn probe_assetless_releases_are_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tag_name": "v1.0", "assets": []},
            {"tag_name": "v0.9"}
        ])))
        .mount(&server)
        .await;

    let client = GithubClient::new(None);
    let outcome = client.probe(&entry_for(&server, "a/b", false)).await.unwrap();
    assert_eq!(outcome, ProbeOutcome::NoReleases);
}

#[tokio::test]
async fn probe_is_idempotent_against_fixed_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tag_name": "v1.0", "assets": [{"name": "x.zip"}]}
        ])))
        .mount(&server)
        .await;

    let client = GithubClient::new(None);
    let entry = entry_for(&server, "a/b", false);

    let first = client.probe(&entry).await.unwrap();
    let second = client.probe(&entry).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn probe_403_with_quota_header_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "0"))
        .mount(&server)
        .await;

    let client = GithubClient::new(None);
    let err = client
        .probe(&entry_for(&server, "a/b", false))
        .await
        .unwrap_err();

    match err {
        ProbeError::RateLimited { remaining } => assert_eq!(remaining, "0"),
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn probe_bare_403_is_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = GithubClient::new(None);
    let err = client
        .probe(&entry_for(&server, "a/b", false))
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Forbidden));
}

#[tokio::test]
async fn probe_other_status_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = GithubClient::new(None);
    let err = client
        .probe(&entry_for(&server, "a/b", false))
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Http(404)));
}

#[tokio::test]
async fn probe_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let client = GithubClient::with_timeout(None, Duration::from_millis(100));
    let err = client
        .probe(&entry_for(&server, "a/b", false))
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Timeout));
}

#[tokio::test]
async fn probe_fetches_language_breakdown_on_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tag_name": "v1.0", "assets": [{"name": "x.zip"}]}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Go": 350,
            "Makefile": 70
        })))
        .mount(&server)
        .await;

    let client = GithubClient::new(None);
    let outcome = client.probe(&entry_for(&server, "a/b", true)).await.unwrap();

    match outcome {
        ProbeOutcome::Found(hit) => {
            assert_eq!(hit.languages["Go"].bytes, 350);
            assert_eq!(hit.languages["Go"].lines, 10);
            assert_eq!(hit.languages["Makefile"].lines, 2);
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn probe_language_lookup_failure_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tag_name": "v1.0", "assets": [{"name": "x.zip"}]}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/languages"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = GithubClient::new(None);
    let outcome = client.probe(&entry_for(&server, "a/b", true)).await.unwrap();

    match outcome {
        ProbeOutcome::Found(hit) => {
            assert_eq!(hit.release_count, 1);
            assert!(hit.languages.is_empty());
        }
        other => panic!("expected Found, got {:?}", other),
    }
}
