use chrono::Utc;
use tracing::info;

use super::get_job::load_job;
use crate::common::{Actor, JobId};
use crate::domains::jobs::models::{Job, JobPatch, JobStatus};
use crate::domains::jobs::{JobError, JobResult};
use crate::kernel::ServerDeps;

/// Move a job along the status graph.
///
/// `completed_at` is set iff the new status is COMPLETED and cleared
/// otherwise. ASSIGNED is only reachable through `assign_artisan_to_job`.
pub async fn update_job_status(
    actor: &Actor,
    job_id: JobId,
    status: &str,
    deps: &ServerDeps,
) -> JobResult<Job> {
    let next = status
        .parse::<JobStatus>()
        .map_err(|e| JobError::invalid(e.to_string()))?;

    let job = load_job(job_id, deps).await?;
    actor.can_view(job.user_id, job.assigned_artisan_id)?;

    if next == JobStatus::Assigned {
        return Err(JobError::invalid(
            "jobs become ASSIGNED by assigning an artisan",
        ));
    }

    if !job.status.can_transition_to(next) {
        return Err(JobError::InvalidTransition {
            from: job.status,
            to: next,
        });
    }

    let completed_at = (next == JobStatus::Completed).then(Utc::now);
    let patch = JobPatch {
        status: Some(next),
        completed_at: Some(completed_at),
        expected_status: Some(job.status),
        ..Default::default()
    };

    // No row means another request moved the job first
    let updated = deps
        .store
        .update_job(job_id, patch)
        .await?
        .ok_or(JobError::InvalidTransition {
            from: job.status,
            to: next,
        })?;

    info!(job_id = %job_id, from = %job.status, to = %next, "Job status updated");
    Ok(updated)
}
