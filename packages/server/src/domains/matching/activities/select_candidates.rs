use anyhow::anyhow;
use tracing::{error, info, instrument, warn};

use super::{log_matching_results, notify_matched_artisans};
use crate::common::JobId;
use crate::config::MatchingConfig;
use crate::domains::jobs::models::Job;
use crate::domains::jobs::{JobError, JobResult};
use crate::domains::matching::models::{EligibleArtisanQuery, MatchOutcome};
use crate::domains::matching::utils::{rank_candidates, Ranking};
use crate::kernel::ServerDeps;

/// Effective top-K for a caller-provided limit.
///
/// Absent or non-positive falls back to the default; anything above the
/// configured maximum is clamped.
pub fn resolve_limit(requested: Option<i64>, config: &MatchingConfig) -> usize {
    let max = config.max_limit.max(1);
    match requested {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(max).min(max),
        _ => config.default_limit.clamp(1, max),
    }
}

/// Load the job and run one matching pass for it
pub async fn match_artisans_for_job(
    job_id: JobId,
    limit: Option<i64>,
    deps: &ServerDeps,
) -> JobResult<MatchOutcome> {
    let job = deps
        .store
        .find_job_by_id(job_id)
        .await?
        .ok_or_else(|| JobError::not_found(format!("job {}", job_id)))?;

    run_matching(&job, resolve_limit(limit, &deps.matching), deps).await
}

/// Query and rank the eligible artisans for a job, without side effects
pub async fn find_ranked_candidates(
    job: &Job,
    limit: usize,
    deps: &ServerDeps,
) -> JobResult<Ranking> {
    let query = EligibleArtisanQuery::for_category(job.service_category_id)
        .near(job.latitude, job.longitude);

    let timeout = deps.matching.query_timeout;
    let candidates =
        tokio::time::timeout(timeout, deps.store.find_eligible_artisans(query))
            .await
            .map_err(|_| anyhow!("candidate query timed out after {:?}", timeout))??;

    Ok(rank_candidates(
        job.latitude,
        job.longitude,
        &candidates,
        limit,
    ))
}

/// Matching pipeline for an already loaded job
///
/// Pipeline:
/// 1. Query eligible artisans (online, located, linked to the category)
/// 2. Score each, drop those outside their own service radius, rank, take top-K
/// 3. Log every evaluated candidate (isolated)
/// 4. Notify the selected artisans (isolated)
#[instrument(skip(job, deps), fields(job_id = %job.id))]
pub async fn run_matching(job: &Job, limit: usize, deps: &ServerDeps) -> JobResult<MatchOutcome> {
    // 1-2. Primary path: failures propagate
    let Ranking {
        evaluated,
        selected,
    } = find_ranked_candidates(job, limit, deps).await?;

    info!(
        evaluated = evaluated.len(),
        selected = selected.len(),
        limit,
        "Ranked artisan candidates"
    );

    let mut outcome = MatchOutcome {
        evaluated_count: evaluated.len(),
        ..MatchOutcome::empty(job.id)
    };

    // 3. Log the full candidate set
    match log_matching_results(job.id, &evaluated, &selected, deps).await {
        Ok(written) => outcome.logged_count = written,
        Err(e) => {
            error!(job_id = %job.id, error = %e, "Failed to write matching log");
            outcome.log_write_error = Some(e.to_string());
        }
    }

    // 4. Notify only the winners
    match notify_matched_artisans(job, &selected, deps).await {
        Ok(sent) => outcome.notified_tokens = sent,
        Err(e) => {
            warn!(job_id = %job.id, error = %e, "Failed to notify matched artisans");
            outcome.notify_error = Some(e.to_string());
        }
    }

    outcome.matches = selected;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit() {
        let config = MatchingConfig::default();
        assert_eq!(resolve_limit(None, &config), 5);
        assert_eq!(resolve_limit(Some(0), &config), 5);
        assert_eq!(resolve_limit(Some(-3), &config), 5);
        assert_eq!(resolve_limit(Some(1), &config), 1);
        assert_eq!(resolve_limit(Some(12), &config), 12);
        assert_eq!(resolve_limit(Some(500), &config), 50);
        assert_eq!(resolve_limit(Some(i64::MAX), &config), 50);
    }

    #[test]
    fn test_resolve_limit_default_never_exceeds_max() {
        let config = MatchingConfig {
            default_limit: 10,
            max_limit: 3,
            ..MatchingConfig::default()
        };
        assert_eq!(resolve_limit(None, &config), 3);
    }
}
