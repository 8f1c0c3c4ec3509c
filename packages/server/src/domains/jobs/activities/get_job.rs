use crate::common::{Actor, JobId};
use crate::domains::jobs::models::Job;
use crate::domains::jobs::{JobError, JobResult};
use crate::domains::matching::activities::{resolve_limit, run_matching};
use crate::domains::matching::models::MatchOutcome;
use crate::kernel::ServerDeps;

pub(crate) async fn load_job(job_id: JobId, deps: &ServerDeps) -> JobResult<Job> {
    deps.store
        .find_job_by_id(job_id)
        .await?
        .ok_or_else(|| JobError::not_found(format!("job {}", job_id)))
}

/// Fetch a job visible to the caller (owner, assigned artisan, or admin)
pub async fn get_job(actor: &Actor, job_id: JobId, deps: &ServerDeps) -> JobResult<Job> {
    let job = load_job(job_id, deps).await?;
    actor.can_view(job.user_id, job.assigned_artisan_id)?;
    Ok(job)
}

/// Run a matching pass for a job owned by the caller (or any job, for admins)
pub async fn get_job_matches(
    actor: &Actor,
    job_id: JobId,
    limit: Option<i64>,
    deps: &ServerDeps,
) -> JobResult<MatchOutcome> {
    let job = load_job(job_id, deps).await?;
    actor.can_manage(job.user_id)?;

    run_matching(&job, resolve_limit(limit, &deps.matching), deps).await
}
