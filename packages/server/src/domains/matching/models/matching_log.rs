use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::common::{ArtisanId, JobId, MatchingLogId};

/// Postgres caps a statement at 65535 bind parameters; 10 columns per row.
const INSERT_CHUNK_ROWS: usize = 1000;

/// JobMatchingLog - one candidate evaluation for one job (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchingLog {
    pub id: MatchingLogId,
    pub job_id: JobId,
    pub artisan_id: ArtisanId,
    pub match_score: f64,
    pub distance_km: f64,
    pub rating: f64,
    pub specialization_level: i32,
    pub is_selected: bool,
    pub notification_sent: bool,
    pub notification_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Row to be written by the matching logger
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatchingLog {
    pub job_id: JobId,
    pub artisan_id: ArtisanId,
    pub match_score: f64,
    pub distance_km: f64,
    pub rating: f64,
    pub specialization_level: i32,
    pub is_selected: bool,
    pub notification_sent: bool,
    pub notification_sent_at: Option<DateTime<Utc>>,
}

impl NewMatchingLog {
    pub fn into_log(self, created_at: DateTime<Utc>) -> JobMatchingLog {
        JobMatchingLog {
            id: MatchingLogId::new(),
            job_id: self.job_id,
            artisan_id: self.artisan_id,
            match_score: self.match_score,
            distance_km: self.distance_km,
            rating: self.rating,
            specialization_level: self.specialization_level,
            is_selected: self.is_selected,
            notification_sent: self.notification_sent,
            notification_sent_at: self.notification_sent_at,
            created_at,
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl JobMatchingLog {
    /// Insert all rows of one matching run in a single transaction.
    ///
    /// Returns the number of rows written; an empty slice is a no-op.
    pub async fn insert_many(rows: &[NewMatchingLog], pool: &PgPool) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let mut written = 0;

        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO job_matching_logs (id, job_id, artisan_id, match_score, distance_km, \
                 rating, specialization_level, is_selected, notification_sent, notification_sent_at) ",
            );

            builder.push_values(chunk, |mut b, row| {
                b.push_bind(MatchingLogId::new())
                    .push_bind(row.job_id)
                    .push_bind(row.artisan_id)
                    .push_bind(row.match_score)
                    .push_bind(row.distance_km)
                    .push_bind(row.rating)
                    .push_bind(row.specialization_level)
                    .push_bind(row.is_selected)
                    .push_bind(row.notification_sent)
                    .push_bind(row.notification_sent_at);
            });

            written += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;

        Ok(written)
    }

    pub async fn find_by_job(job_id: JobId, pool: &PgPool) -> Result<Vec<Self>> {
        let logs = sqlx::query_as::<_, Self>(
            "SELECT * FROM job_matching_logs WHERE job_id = $1 ORDER BY match_score DESC, distance_km ASC",
        )
        .bind(job_id)
        .fetch_all(pool)
        .await?;

        Ok(logs)
    }
}
