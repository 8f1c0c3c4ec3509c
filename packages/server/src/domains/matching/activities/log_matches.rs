use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, instrument};

use crate::common::JobId;
use crate::domains::matching::models::{JobMatchingResult, NewMatchingLog};
use crate::kernel::ServerDeps;

/// One row per evaluated candidate.
///
/// `is_selected` and `notification_sent` come from membership in `selected`;
/// `notification_sent_at` is `now` for selected rows only, since dispatch is
/// attempted right after the write.
pub fn build_log_rows(
    job_id: JobId,
    evaluated: &[JobMatchingResult],
    selected: &[JobMatchingResult],
    now: DateTime<Utc>,
) -> Vec<NewMatchingLog> {
    let selected_ids: HashSet<_> = selected.iter().map(|r| r.artisan_id).collect();

    evaluated
        .iter()
        .map(|result| {
            let is_selected = selected_ids.contains(&result.artisan_id);
            NewMatchingLog {
                job_id,
                artisan_id: result.artisan_id,
                match_score: result.match_score,
                distance_km: result.distance_km,
                rating: result.rating,
                specialization_level: result.specialization_level,
                is_selected,
                notification_sent: is_selected,
                notification_sent_at: is_selected.then_some(now),
            }
        })
        .collect()
}

/// Persist the whole candidate set of one matching run in one bulk write
#[instrument(skip(evaluated, selected, deps), fields(job_id = %job_id, evaluated = evaluated.len()))]
pub async fn log_matching_results(
    job_id: JobId,
    evaluated: &[JobMatchingResult],
    selected: &[JobMatchingResult],
    deps: &ServerDeps,
) -> Result<u64> {
    if evaluated.is_empty() {
        debug!("No candidates evaluated, nothing to log");
        return Ok(0);
    }

    let rows = build_log_rows(job_id, evaluated, selected, Utc::now());
    let written = deps.store.bulk_insert_matching_logs(rows).await?;

    debug!(written, "Matching log written");
    Ok(written)
}
