//! Concurrent dispatch of repository probes.
//!
//! Fans the prober out over all entries with a fixed-size worker pool and
//! collects results as they complete. Completion order is unconstrained;
//! one probe's failure never affects another. The only shared mutable
//! resource is the progress stream, guarded by [`ProgressLog`].

use std::sync::{Mutex, PoisonError};

use colored::*;
use futures::stream::{self, StreamExt};

use crate::github::{GithubClient, ProbeError, ProbeOutcome};
use crate::search::RepoEntry;

/// Default worker-pool size.
pub const DEFAULT_WORKERS: usize = 10;

/// Mutual-exclusion guard for progress output.
///
/// Shared by reference with every worker so lines from concurrent probes
/// are never torn mid-message.
#[derive(Default)]
pub struct ProgressLog {
    lock: Mutex<()>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print one progress line under the guard.
    pub fn line(&self, msg: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        println!("{}", msg);
    }
}

/// Probe every entry with a pool of `workers` concurrent tasks.
///
/// Each task is tagged with its 1-based index and the total count for
/// progress display only. The returned vector is in completion order; the
/// collect below is the barrier that drains every task before aggregation.
pub async fn scan(
    client: &GithubClient,
    entries: Vec<RepoEntry>,
    workers: usize,
    progress: &ProgressLog,
) -> Vec<(RepoEntry, Result<ProbeOutcome, ProbeError>)> {
    let total = entries.len();

    stream::iter(entries.into_iter().enumerate())
        .map(|(idx, entry)| async move {
            progress.line(&format!(
                "[{}/{}] checking {}",
                idx + 1,
                total,
                entry.full_name
            ));

            let outcome = client.probe(&entry).await;
            progress.line(&outcome_line(&entry, &outcome));

            (entry, outcome)
        })
        .buffer_unordered(workers.max(1))
        .collect()
        .await
}

/// Format the per-repository result line.
fn outcome_line(entry: &RepoEntry, outcome: &Result<ProbeOutcome, ProbeError>) -> String {
    match outcome {
        Ok(ProbeOutcome::Found(hit)) => {
            let plural = if hit.release_count != 1 { "s" } else { "" };
            format!(
                "    {} {} has {} release{} with assets",
                "✓".green(),
                entry.full_name,
                hit.release_count,
                plural
            )
        }
        Ok(ProbeOutcome::NoReleases) => format!(
            "    {} {} has no releases with assets",
            "✗".dimmed(),
            entry.full_name
        ),
        Err(e) => format!("    {} {}: {}", "!".yellow(), entry.full_name, e),
    }
}
