use crate::common::{Actor, JobId};
use crate::domains::jobs::{JobError, JobResult};
use crate::domains::matching::models::{JobMatchingLog, MatchingAnalytics};
use crate::kernel::ServerDeps;

/// Aggregate matching statistics (admin only)
pub async fn get_matching_analytics(
    actor: &Actor,
    deps: &ServerDeps,
) -> JobResult<MatchingAnalytics> {
    actor.require_admin()?;
    Ok(deps.store.matching_analytics().await?)
}

/// Raw matching log of one job (admin only)
pub async fn get_matching_logs(
    actor: &Actor,
    job_id: JobId,
    deps: &ServerDeps,
) -> JobResult<Vec<JobMatchingLog>> {
    actor.require_admin()?;

    if deps.store.find_job_by_id(job_id).await?.is_none() {
        return Err(JobError::not_found(format!("job {}", job_id)));
    }

    Ok(deps.store.find_matching_logs(job_id).await?)
}
