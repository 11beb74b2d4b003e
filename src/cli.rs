//! Command-line interface for relcheck.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;

use crate::github::GithubClient;
use crate::report;
use crate::scan::{self, ProgressLog};
use crate::search;
use crate::summary;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable holding the GitHub token.
const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Check which GitHub repositories publish release artifacts.
///
/// Relcheck takes a GitHub search-result document, probes every listed
/// repository's releases endpoint concurrently, and reports the ones that
/// publish releases with downloadable assets, ranked by release count.
#[derive(Parser)]
#[command(name = "relcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe every repository in a search-result document
    #[command(visible_alias = "scan")]
    Check(CheckArgs),
    /// Show the API rate-limit status for the current credential
    Limits,
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the search-result JSON document
    pub input: PathBuf,

    /// Number of concurrent probe workers
    #[arg(short, long, default_value_t = 20)]
    pub workers: usize,

    /// Where to write the JSON result artifact
    #[arg(short, long, default_value = "repos_with_releases.json")]
    pub output: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Read the token from the environment, reporting the effective rate limit.
fn read_token() -> Option<String> {
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.is_empty() => {
            println!("{} authenticated (5000 requests/hour)", "✓".green());
            Some(token)
        }
        _ => {
            eprintln!("{} no token found (60 requests/hour)", "⚠".yellow());
            eprintln!("  set {} to raise the limit:", TOKEN_ENV);
            eprintln!("  https://github.com/settings/tokens (public_repo scope is enough)");
            None
        }
    }
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    if !args.input.exists() {
        eprintln!("Error: input file not found: {}", args.input.display());
        return Ok(EXIT_ERROR);
    }

    let token = read_token();

    let (entries, total) = search::load_search_results(&args.input)?;
    println!(
        "found {} repositories, checking with {} workers",
        total, args.workers
    );
    println!();

    let client = GithubClient::new(token.as_deref());
    let progress = ProgressLog::new();

    let runtime = tokio::runtime::Runtime::new()?;
    let results = runtime.block_on(scan::scan(&client, entries, args.workers, &progress));

    let summary = summary::summarize(results);

    match args.format.as_str() {
        "json" => report::write_json(&summary)?,
        _ => report::write_pretty(&summary),
    }

    // The artifact is only written when something qualified.
    if !summary.hits.is_empty() {
        report::write_json_file(&args.output, &summary)?;
        println!("results saved to {}", args.output.display());
    }

    Ok(EXIT_SUCCESS)
}

/// Run the limits command.
pub fn run_limits() -> anyhow::Result<i32> {
    let token = read_token();
    let client = GithubClient::new(token.as_deref());

    let runtime = tokio::runtime::Runtime::new()?;
    let status = match runtime.block_on(client.rate_limit()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: rate-limit check failed: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    println!();
    println!(
        "  remaining requests: {}/{}",
        status.remaining, status.limit
    );
    println!("  resets in {} minutes", status.minutes_until_reset());

    if status.is_exhausted() {
        println!();
        println!(
            "  {} quota exhausted, wait {} minutes before retrying",
            "⚠".yellow(),
            status.minutes_until_reset()
        );
    }

    Ok(EXIT_SUCCESS)
}
