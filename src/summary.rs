//! Aggregation of probe results into the final report.
//!
//! Discards non-matches and errors, ranks the hits by release count, and
//! carries the total probed count for the summary line.

use crate::github::{ProbeError, ProbeOutcome, ReleaseHit};
use crate::search::RepoEntry;

/// The aggregated scan outcome.
///
/// Invariant: every hit has `release_count >= 1`, and hits are ordered by
/// descending release count with ties in encounter order.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub hits: Vec<ReleaseHit>,
    pub total: usize,
}

impl ScanSummary {
    /// The one-line summary shown to the user and embedded in the report.
    pub fn headline(&self) -> String {
        format!(
            "{}/{} repositories have qualifying releases",
            self.hits.len(),
            self.total
        )
    }
}

/// Aggregate the dispatcher's results.
///
/// `NoReleases` outcomes and per-repository errors are dropped; they were
/// already reported individually during the run.
pub fn summarize(
    results: Vec<(RepoEntry, Result<ProbeOutcome, ProbeError>)>,
) -> ScanSummary {
    let total = results.len();
    let hits = results
        .into_iter()
        .filter_map(|(_, outcome)| match outcome {
            Ok(ProbeOutcome::Found(hit)) => Some(hit),
            _ => None,
        })
        .collect();

    ScanSummary {
        hits: rank(hits),
        total,
    }
}

/// Sort hits by descending release count. The sort is stable, so hits with
/// equal counts keep their relative order.
fn rank(mut hits: Vec<ReleaseHit>) -> Vec<ReleaseHit> {
    hits.sort_by(|a, b| b.release_count.cmp(&a.release_count));
    hits
}
