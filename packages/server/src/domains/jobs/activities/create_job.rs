use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::common::utils::validate_coordinates;
use crate::common::{Actor, ServiceCategoryId};
use crate::domains::jobs::models::{Job, NewJob};
use crate::domains::jobs::{JobError, JobResult};
use crate::domains::matching::activities::{resolve_limit, run_matching};
use crate::domains::matching::models::MatchOutcome;
use crate::domains::service_categories::find_service_category;
use crate::kernel::ServerDeps;

pub const MAX_DESCRIPTION_CHARS: usize = 2000;
pub const MAX_PHOTOS: usize = 10;

/// Request body for creating a job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobInput {
    pub service_category_id: ServiceCategoryId,
    pub description: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub preferred_time: Option<DateTime<Utc>>,
    pub estimated_cost: Option<f64>,
}

impl CreateJobInput {
    pub fn validate(&self) -> JobResult<()> {
        if !validate_coordinates(self.latitude, self.longitude) {
            return Err(JobError::invalid(format!(
                "coordinates out of range: ({}, {})",
                self.latitude, self.longitude
            )));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(JobError::invalid("description is required"));
        }
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(JobError::invalid(format!(
                "description must be at most {} characters",
                MAX_DESCRIPTION_CHARS
            )));
        }

        if self.photo_urls.len() > MAX_PHOTOS {
            return Err(JobError::invalid(format!(
                "at most {} photos per job",
                MAX_PHOTOS
            )));
        }
        if self.photo_urls.iter().any(|url| url.trim().is_empty()) {
            return Err(JobError::invalid("photo URLs must not be empty"));
        }

        if let Some(cost) = self.estimated_cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err(JobError::invalid("estimated cost must be a non-negative number"));
            }
        }

        Ok(())
    }
}

/// Created job plus the outcome of the matching pass run for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobCreation {
    pub job: Job,
    pub matching: MatchOutcome,
    /// Set when the matching pass itself failed; the job is still created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_error: Option<String>,
}

/// Create a job in PENDING and run one matching pass before returning.
///
/// Input is validated before anything is written. A matching failure is
/// logged and reported in the result, never returned as an error.
#[instrument(skip(input, deps), fields(user_id = %actor.user_id))]
pub async fn create_job(
    actor: &Actor,
    input: CreateJobInput,
    deps: &ServerDeps,
) -> JobResult<JobCreation> {
    input.validate()?;

    if find_service_category(input.service_category_id, deps)
        .await?
        .is_none()
    {
        return Err(JobError::not_found(format!(
            "service category {}",
            input.service_category_id
        )));
    }

    let job = deps
        .store
        .create_job(NewJob {
            user_id: actor.user_id,
            service_category_id: input.service_category_id,
            description: input.description.trim().to_string(),
            photo_urls: input.photo_urls,
            latitude: input.latitude,
            longitude: input.longitude,
            preferred_time: input.preferred_time,
            estimated_cost: input.estimated_cost,
        })
        .await?;

    info!(job_id = %job.id, "Job created");

    let limit = resolve_limit(None, &deps.matching);
    let (matching, matching_error) = match run_matching(&job, limit, deps).await {
        Ok(outcome) => (outcome, None),
        Err(e) => {
            error!(job_id = %job.id, error = %e, "Matching failed for new job");
            (MatchOutcome::empty(job.id), Some(e.to_string()))
        }
    };

    Ok(JobCreation {
        job,
        matching,
        matching_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateJobInput {
        CreateJobInput {
            service_category_id: ServiceCategoryId::new(),
            description: "Replace the bathroom tap".to_string(),
            photo_urls: vec!["https://cdn.example.com/tap.jpg".to_string()],
            latitude: 6.5244,
            longitude: 3.3792,
            preferred_time: None,
            estimated_cost: Some(15000.0),
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        let bad_lat = CreateJobInput {
            latitude: 100.0,
            ..input()
        };
        assert!(matches!(bad_lat.validate(), Err(JobError::InvalidInput(_))));

        let bad_lon = CreateJobInput {
            longitude: -180.5,
            ..input()
        };
        assert!(matches!(bad_lon.validate(), Err(JobError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_blank_description_and_negative_cost() {
        let blank = CreateJobInput {
            description: "   ".to_string(),
            ..input()
        };
        assert!(matches!(blank.validate(), Err(JobError::InvalidInput(_))));

        let negative = CreateJobInput {
            estimated_cost: Some(-1.0),
            ..input()
        };
        assert!(matches!(negative.validate(), Err(JobError::InvalidInput(_))));
    }

    #[test]
    fn test_deserializes_camel_case_body() {
        let category = ServiceCategoryId::new();
        let body = serde_json::json!({
            "serviceCategoryId": category,
            "description": "Fix wiring",
            "latitude": 6.5,
            "longitude": 3.4
        });
        let parsed: CreateJobInput = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.service_category_id, category);
        assert!(parsed.photo_urls.is_empty());
        assert!(parsed.estimated_cost.is_none());
    }
}
