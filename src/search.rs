//! Loading of GitHub search-result documents.
//!
//! The primary path parses the document as JSON and maps the `items` array
//! into [`RepoEntry`] records. When the document is malformed (truncated
//! downloads are common with large search exports), a regex-based lenient
//! extractor recovers what it can from the raw text instead.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

/// One repository to probe, resolved from the search document at load time.
///
/// String fields carry their documented defaults (`"Unknown"` for the name,
/// `"N/A"` for the web URL, empty for the rest); fields the document may omit
/// entirely stay `Option`. Timestamps are kept as opaque strings.
#[derive(Debug, Clone)]
pub struct RepoEntry {
    pub full_name: String,
    pub html_url: String,
    /// Releases endpoint template, still containing the `{/id}` placeholder.
    pub releases_url: String,
    pub description: String,
    pub language: Option<String>,
    pub languages_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
}

/// Wire shape of a GitHub search-result document.
#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(default)]
    items: Vec<RawItem>,
}

/// Wire shape of one repository item. Everything is optional here; defaults
/// are resolved exactly once when converting to [`RepoEntry`].
#[derive(Debug, Default, Deserialize)]
struct RawItem {
    full_name: Option<String>,
    html_url: Option<String>,
    releases_url: Option<String>,
    description: Option<String>,
    language: Option<String>,
    languages_url: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    pushed_at: Option<String>,
}

impl From<RawItem> for RepoEntry {
    fn from(item: RawItem) -> Self {
        RepoEntry {
            full_name: item.full_name.unwrap_or_else(|| "Unknown".to_string()),
            html_url: item.html_url.unwrap_or_else(|| "N/A".to_string()),
            releases_url: item.releases_url.unwrap_or_default(),
            description: item.description.unwrap_or_default(),
            language: item.language,
            languages_url: item.languages_url,
            created_at: item.created_at,
            updated_at: item.updated_at,
            pushed_at: item.pushed_at,
        }
    }
}

lazy_static! {
    /// Pattern for the lenient extractor. Matches one repository's fields in
    /// document order: full_name, description, language, languages_url, the
    /// three timestamps, and the owner/repo segment of releases_url.
    /// Nullable fields match either a quoted string or the literal null.
    static ref REPO_PATTERN: Regex = Regex::new(
        r#"(?s)"full_name":\s*"([^"]+)".*?"description":\s*(?:"([^"]*)"|null).*?"language":\s*(?:"([^"]*)"|null).*?"languages_url":\s*"([^"]+)".*?"created_at":\s*"([^"]+)".*?"updated_at":\s*"([^"]+)".*?"pushed_at":\s*"([^"]+)".*?"releases_url":\s*"https://api\.github\.com/repos/([^/"]+/[^/"]+)/releases"#
    ).unwrap();
}

/// Load repositories from a search-result file.
///
/// Returns the entries plus the total count. Fails only when the file cannot
/// be read, or when the document is malformed AND the lenient extractor
/// recovers nothing.
pub fn load_search_results(path: &Path) -> anyhow::Result<(Vec<RepoEntry>, usize)> {
    let bytes = fs::read(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
    // Search exports saved on some platforms carry stray non-UTF-8 bytes;
    // decode lossily rather than refusing the whole file.
    let content = String::from_utf8_lossy(&bytes);

    let entries: Vec<RepoEntry> = match serde_json::from_str::<SearchDocument>(&content) {
        Ok(doc) => doc.items.into_iter().map(RepoEntry::from).collect(),
        Err(e) => {
            eprintln!(
                "warning: JSON parse failed (line {} column {}), falling back to pattern extraction",
                e.line(),
                e.column()
            );
            let recovered = extract_lenient(&content);
            if recovered.is_empty() {
                anyhow::bail!(
                    "could not extract any repositories from {}",
                    path.display()
                );
            }
            eprintln!("recovered {} repositories by pattern", recovered.len());
            recovered
        }
    };

    let total = entries.len();
    Ok((entries, total))
}

/// Recover repository entries from malformed JSON by pattern matching.
///
/// The web URL and the releases template are reconstructed from the
/// owner/repo segment; quoted-null fields decode to empty.
pub fn extract_lenient(content: &str) -> Vec<RepoEntry> {
    REPO_PATTERN
        .captures_iter(content)
        .map(|caps| {
            let repo_path = &caps[8];
            RepoEntry {
                full_name: caps[1].to_string(),
                html_url: format!("https://github.com/{}", repo_path),
                releases_url: format!(
                    "https://api.github.com/repos/{}/releases{{/id}}",
                    repo_path
                ),
                description: caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                language: caps
                    .get(3)
                    .map(|m| m.as_str().to_string())
                    .filter(|s| !s.is_empty()),
                languages_url: Some(caps[4].to_string()),
                created_at: Some(caps[5].to_string()),
                updated_at: Some(caps[6].to_string()),
                pushed_at: Some(caps[7].to_string()),
            }
        })
        .collect()
}
