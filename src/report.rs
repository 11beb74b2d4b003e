//! Output formatting for scan results.
//!
//! Supports two output surfaces:
//! - Pretty: colored terminal listing for human readability
//! - JSON: structured artifact for programmatic consumption

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::github::LanguageStat;
use crate::summary::ScanSummary;

/// Top-level JSON artifact.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    /// Summary line, kept as a comment field so the artifact is
    /// self-describing when opened by hand.
    #[serde(rename = "__comment")]
    pub comment: String,
    pub repos: Vec<JsonRepo>,
}

/// One repository entry in the JSON artifact.
#[derive(Serialize, Deserialize)]
pub struct JsonRepo {
    pub name: String,
    pub repo_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages_url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub languages: BTreeMap<String, LanguageStat>,
    pub releases_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<String>,
}

/// Build the JSON artifact from a summary.
pub fn to_json_report(summary: &ScanSummary) -> JsonReport {
    let repos = summary
        .hits
        .iter()
        .map(|hit| JsonRepo {
            name: hit.name.clone(),
            repo_url: hit.repo_url.clone(),
            description: hit.description.clone(),
            language: hit.language.clone(),
            languages_url: hit.languages_url.clone(),
            languages: hit.languages.clone(),
            releases_count: hit.release_count,
            created_at: hit.created_at.clone(),
            updated_at: hit.updated_at.clone(),
            pushed_at: hit.pushed_at.clone(),
        })
        .collect();

    JsonReport {
        comment: summary.headline(),
        repos,
    }
}

/// Write the JSON artifact to stdout.
pub fn write_json(summary: &ScanSummary) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&to_json_report(summary))?;
    println!("{}", json);
    Ok(())
}

/// Write the JSON artifact to a file.
pub fn write_json_file(path: &Path, summary: &ScanSummary) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&to_json_report(summary))?;
    fs::write(path, json)?;
    Ok(())
}

/// Write the human-readable listing.
pub fn write_pretty(summary: &ScanSummary) {
    println!();
    println!("  {}", "=".repeat(60).dimmed());
    println!("  {}", summary.headline().bold());
    println!("  {}", "=".repeat(60).dimmed());
    println!();

    for hit in &summary.hits {
        let plural = if hit.release_count != 1 { "s" } else { "" };
        print!("  {} {}", "✓".green(), hit.name.bold());
        println!(
            " {}",
            format!("({} release{} with assets)", hit.release_count, plural).dimmed()
        );
        println!("    {}", hit.repo_url.blue());

        if let Some(language) = &hit.language {
            println!("    {}", language.dimmed());
        }
        if !hit.description.is_empty() {
            println!("    {}", hit.description);
        }
        println!();
    }
}
