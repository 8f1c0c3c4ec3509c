use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;

use super::JobMatchingLog;
use crate::common::utils::round2;

/// Aggregates over every JobMatchingLog row
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchingAnalytics {
    pub total_evaluations: i64,
    pub jobs_matched: i64,
    pub selected_count: i64,
    pub notifications_sent: i64,
    pub average_score: f64,
    pub average_distance_km: f64,
    pub average_selected_score: f64,
    pub average_candidates_per_job: f64,
}

impl MatchingAnalytics {
    /// Compute the aggregates from rows already in memory
    pub fn from_logs(logs: &[JobMatchingLog]) -> Self {
        if logs.is_empty() {
            return Self::default();
        }

        let total = logs.len() as f64;
        let jobs: HashSet<_> = logs.iter().map(|l| l.job_id).collect();
        let selected: Vec<_> = logs.iter().filter(|l| l.is_selected).collect();

        let average_selected_score = if selected.is_empty() {
            0.0
        } else {
            selected.iter().map(|l| l.match_score).sum::<f64>() / selected.len() as f64
        };

        Self {
            total_evaluations: logs.len() as i64,
            jobs_matched: jobs.len() as i64,
            selected_count: selected.len() as i64,
            notifications_sent: logs.iter().filter(|l| l.notification_sent).count() as i64,
            average_score: logs.iter().map(|l| l.match_score).sum::<f64>() / total,
            average_distance_km: logs.iter().map(|l| l.distance_km).sum::<f64>() / total,
            average_selected_score,
            average_candidates_per_job: total / jobs.len() as f64,
        }
        .rounded()
    }

    fn rounded(self) -> Self {
        Self {
            average_score: round2(self.average_score),
            average_distance_km: round2(self.average_distance_km),
            average_selected_score: round2(self.average_selected_score),
            average_candidates_per_job: round2(self.average_candidates_per_job),
            ..self
        }
    }

    pub async fn compute(pool: &PgPool) -> Result<Self> {
        let analytics = sqlx::query_as::<_, Self>(
            r#"
            SELECT
                COUNT(*) AS total_evaluations,
                COUNT(DISTINCT job_id) AS jobs_matched,
                COUNT(*) FILTER (WHERE is_selected) AS selected_count,
                COUNT(*) FILTER (WHERE notification_sent) AS notifications_sent,
                COALESCE(AVG(match_score), 0)::float8 AS average_score,
                COALESCE(AVG(distance_km), 0)::float8 AS average_distance_km,
                COALESCE(AVG(match_score) FILTER (WHERE is_selected), 0)::float8
                    AS average_selected_score,
                COALESCE(COUNT(*)::float8 / NULLIF(COUNT(DISTINCT job_id), 0), 0)::float8
                    AS average_candidates_per_job
            FROM job_matching_logs
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(analytics.rounded())
    }
}
