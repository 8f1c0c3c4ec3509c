use serde::{Deserialize, Serialize};
use tracing::info;

use super::get_job::load_job;
use crate::common::{Actor, ArtisanId, JobId};
use crate::domains::jobs::models::{Job, JobPatch, JobStatus};
use crate::domains::jobs::{JobError, JobResult};
use crate::kernel::ServerDeps;

/// Request body for assigning an artisan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignArtisanInput {
    pub artisan_id: ArtisanId,
}

/// Assign an artisan and move the job to ASSIGNED.
///
/// Allowed from PENDING, and from ASSIGNED to hand the job to someone else.
pub async fn assign_artisan_to_job(
    actor: &Actor,
    job_id: JobId,
    artisan_id: ArtisanId,
    deps: &ServerDeps,
) -> JobResult<Job> {
    let job = load_job(job_id, deps).await?;
    actor.can_manage(job.user_id)?;

    if !job.status.can_transition_to(JobStatus::Assigned) {
        return Err(JobError::InvalidTransition {
            from: job.status,
            to: JobStatus::Assigned,
        });
    }

    if deps.store.find_artisan(artisan_id).await?.is_none() {
        return Err(JobError::not_found(format!("artisan {}", artisan_id)));
    }

    let patch = JobPatch {
        status: Some(JobStatus::Assigned),
        assigned_artisan_id: Some(artisan_id),
        completed_at: Some(None),
        expected_status: Some(job.status),
    };

    let updated = deps
        .store
        .update_job(job_id, patch)
        .await?
        .ok_or(JobError::InvalidTransition {
            from: job.status,
            to: JobStatus::Assigned,
        })?;

    info!(job_id = %job_id, artisan_id = %artisan_id, "Artisan assigned to job");
    Ok(updated)
}
