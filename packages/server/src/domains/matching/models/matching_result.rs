use serde::{Deserialize, Serialize};

use crate::common::{ArtisanId, JobId};

/// One scored candidate for one job. Never persisted as-is; the logger
/// turns each result into a `JobMatchingLog` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchingResult {
    pub artisan_id: ArtisanId,
    pub artisan_name: String,
    pub photo_url: Option<String>,
    pub match_score: f64,
    pub distance_km: f64,
    pub rating: f64,
    pub specialization_level: i32,
    pub is_online: bool,
    pub service_radius_km: f64,
}

impl JobMatchingResult {
    pub fn is_within_service_radius(&self) -> bool {
        self.distance_km <= self.service_radius_km
    }
}

/// Result of one matching run
///
/// The post-processing stages (log write, push dispatch) run in their own
/// error boundaries; a failure there is reported here instead of failing
/// the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub job_id: JobId,
    /// Selected artisans, best first
    pub matches: Vec<JobMatchingResult>,
    /// Number of candidates scored (and logged) in this run
    pub evaluated_count: usize,
    pub logged_count: u64,
    pub notified_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_write_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_error: Option<String>,
}

impl MatchOutcome {
    pub fn empty(job_id: JobId) -> Self {
        Self {
            job_id,
            matches: Vec::new(),
            evaluated_count: 0,
            logged_count: 0,
            notified_tokens: 0,
            log_write_error: None,
            notify_error: None,
        }
    }

    pub fn has_partial_failure(&self) -> bool {
        self.log_write_error.is_some() || self.notify_error.is_some()
    }
}
