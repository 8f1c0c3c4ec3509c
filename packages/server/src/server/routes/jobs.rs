//! Job and matching REST handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::JobId;
use crate::domains::jobs::activities::{
    assign_artisan_to_job, create_job, get_job, get_job_matches, update_job_status,
    AssignArtisanInput, CreateJobInput, JobCreation,
};
use crate::domains::jobs::Job;
use crate::domains::matching::{
    get_matching_analytics, get_matching_logs, JobMatchingLog, MatchOutcome, MatchingAnalytics,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_auth, AuthUser};

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

/// POST /api/jobs
pub async fn create_job_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    body: Result<Json<CreateJobInput>, JsonRejection>,
) -> Result<(StatusCode, Json<JobCreation>), ApiError> {
    let actor = require_auth(auth)?;
    let Json(input) = body?;

    let created = create_job(&actor, input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/jobs/:job_id
pub async fn get_job_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    job_id: Result<Path<JobId>, PathRejection>,
) -> Result<Json<Job>, ApiError> {
    let actor = require_auth(auth)?;
    let Path(job_id) = job_id?;

    Ok(Json(get_job(&actor, job_id, &state.deps).await?))
}

/// GET /api/jobs/:job_id/matches?limit=N
pub async fn get_job_matches_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    job_id: Result<Path<JobId>, PathRejection>,
    query: Result<Query<MatchesQuery>, QueryRejection>,
) -> Result<Json<MatchOutcome>, ApiError> {
    let actor = require_auth(auth)?;
    let Path(job_id) = job_id?;
    let Query(query) = query?;

    Ok(Json(
        get_job_matches(&actor, job_id, query.limit, &state.deps).await?,
    ))
}

/// PUT /api/jobs/:job_id/status
pub async fn update_job_status_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    job_id: Result<Path<JobId>, PathRejection>,
    body: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> Result<Json<Job>, ApiError> {
    let actor = require_auth(auth)?;
    let Path(job_id) = job_id?;
    let Json(body) = body?;

    Ok(Json(
        update_job_status(&actor, job_id, &body.status, &state.deps).await?,
    ))
}

/// POST /api/jobs/:job_id/assign
pub async fn assign_artisan_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    job_id: Result<Path<JobId>, PathRejection>,
    body: Result<Json<AssignArtisanInput>, JsonRejection>,
) -> Result<Json<Job>, ApiError> {
    let actor = require_auth(auth)?;
    let Path(job_id) = job_id?;
    let Json(body) = body?;

    Ok(Json(
        assign_artisan_to_job(&actor, job_id, body.artisan_id, &state.deps).await?,
    ))
}

/// GET /api/jobs/:job_id/matching-logs (admin)
pub async fn get_matching_logs_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    job_id: Result<Path<JobId>, PathRejection>,
) -> Result<Json<Vec<JobMatchingLog>>, ApiError> {
    let actor = require_auth(auth)?;
    let Path(job_id) = job_id?;

    Ok(Json(get_matching_logs(&actor, job_id, &state.deps).await?))
}

/// GET /api/jobs/analytics/matching (admin)
pub async fn matching_analytics_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<MatchingAnalytics>, ApiError> {
    let actor = require_auth(auth)?;

    Ok(Json(get_matching_analytics(&actor, &state.deps).await?))
}
