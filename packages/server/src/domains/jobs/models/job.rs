use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::{ArtisanId, JobId, ServiceCategoryId, UserId};

/// Job status
///
/// PENDING → ASSIGNED → IN_PROGRESS → COMPLETED, with CANCELLED and EXPIRED
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
    Expired,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Expired)
    }

    /// Edges of the job state graph.
    ///
    /// ASSIGNED → ASSIGNED is allowed so a job can be re-assigned to another
    /// artisan before work starts.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Cancelled | Self::Expired => true,
            Self::Assigned => matches!(self, Self::Pending | Self::Assigned),
            Self::InProgress => *self == Self::Assigned,
            Self::Completed => *self == Self::InProgress,
            Self::Pending => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJobStatus(pub String);

impl fmt::Display for UnknownJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized job status: {}", self.0)
    }
}

impl std::error::Error for UnknownJobStatus {}

impl FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ASSIGNED" => Ok(Self::Assigned),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(UnknownJobStatus(s.to_string())),
        }
    }
}

/// Job - a customer's service request
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub user_id: UserId,
    pub service_category_id: ServiceCategoryId,
    pub description: String,
    pub photo_urls: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub preferred_time: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub assigned_artisan_id: Option<ArtisanId>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when a job is created; status always starts at PENDING
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub user_id: UserId,
    pub service_category_id: ServiceCategoryId,
    pub description: String,
    pub photo_urls: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub preferred_time: Option<DateTime<Utc>>,
    pub estimated_cost: Option<f64>,
}

/// Partial update of a job. `None` leaves the column untouched;
/// `completed_at: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub assigned_artisan_id: Option<ArtisanId>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    /// Only write when the stored status still equals this one
    pub expected_status: Option<JobStatus>,
}

impl JobPatch {
    /// True when the guard (if any) matches the job's current status
    pub fn applies_to(&self, job: &Job) -> bool {
        self.expected_status.map_or(true, |expected| job.status == expected)
    }

    /// Apply the patch to an in-memory job (used by non-SQL stores)
    pub fn apply(&self, job: &mut Job, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(artisan_id) = self.assigned_artisan_id {
            job.assigned_artisan_id = Some(artisan_id);
        }
        if let Some(completed_at) = self.completed_at {
            job.completed_at = completed_at;
        }
        job.updated_at = now;
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Job {
    pub async fn find_by_id(id: JobId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn insert(new_job: &NewJob, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO jobs (
                id,
                user_id,
                service_category_id,
                description,
                photo_urls,
                latitude,
                longitude,
                preferred_time,
                status,
                estimated_cost
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'PENDING', $9)
            RETURNING *
            "#,
        )
        .bind(JobId::new())
        .bind(new_job.user_id)
        .bind(new_job.service_category_id)
        .bind(&new_job.description)
        .bind(&new_job.photo_urls)
        .bind(new_job.latitude)
        .bind(new_job.longitude)
        .bind(new_job.preferred_time)
        .bind(new_job.estimated_cost)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Returns `None` when the job is missing or its status no longer
    /// matches `patch.expected_status`
    pub async fn update(id: JobId, patch: &JobPatch, pool: &PgPool) -> Result<Option<Self>> {
        let (set_completed_at, completed_at) = match patch.completed_at {
            Some(value) => (true, value),
            None => (false, None),
        };

        sqlx::query_as::<_, Self>(
            r#"
            UPDATE jobs
            SET status = COALESCE($2, status),
                assigned_artisan_id = COALESCE($3, assigned_artisan_id),
                completed_at = CASE WHEN $4 THEN $5 ELSE completed_at END,
                updated_at = NOW()
            WHERE id = $1
              AND ($6::job_status IS NULL OR status = $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.status)
        .bind(patch.assigned_artisan_id)
        .bind(set_completed_at)
        .bind(completed_at)
        .bind(patch.expected_status)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
