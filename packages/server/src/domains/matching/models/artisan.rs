use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::utils::{get_bounding_box, KM_PER_DEGREE};
use crate::common::{ArtisanId, ServiceCategoryId, UserId};

/// Artisan row as seen by the matcher
///
/// Only online artisans with both coordinates set and a link to the
/// requested category are ever returned by [`ArtisanCandidate::find_eligible`].
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtisanCandidate {
    pub id: ArtisanId,
    pub name: String,
    pub photo_url: Option<String>,
    pub is_online: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub average_rating: f64,
    pub service_radius_km: f64,
    /// Level recorded for the requested category (1-5, defaults to 1)
    pub specialization_level: i32,
}

/// Extra reach added to every service radius before building the coarse box
///
/// Covers the gap between the 111.32 km/degree approximation and the
/// Haversine radius, plus distance rounding.
pub const PREFILTER_SLACK_FACTOR: f64 = 1.01;
pub const PREFILTER_SLACK_KM: f64 = 0.01;

/// Radius of the coarse box drawn around the job for one artisan
pub fn prefilter_reach_km(service_radius_km: f64) -> f64 {
    service_radius_km * PREFILTER_SLACK_FACTOR + PREFILTER_SLACK_KM
}

/// Filter handed to the candidate query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EligibleArtisanQuery {
    pub service_category_id: ServiceCategoryId,
    /// Job location. When set, each artisan must fall inside a coarse box
    /// sized by its own service radius; exact distance is checked later.
    pub origin: Option<(f64, f64)>,
}

impl EligibleArtisanQuery {
    pub fn for_category(service_category_id: ServiceCategoryId) -> Self {
        Self {
            service_category_id,
            origin: None,
        }
    }

    pub fn near(mut self, latitude: f64, longitude: f64) -> Self {
        self.origin = Some((latitude, longitude));
        self
    }

    /// Same predicate as the SQL query, for stores that filter in memory
    pub fn admits(&self, candidate: &ArtisanCandidate) -> bool {
        let (Some(lat), Some(lon)) = (candidate.latitude, candidate.longitude) else {
            return false;
        };
        if !candidate.is_online {
            return false;
        }
        self.origin.map_or(true, |(origin_lat, origin_lon)| {
            get_bounding_box(
                origin_lat,
                origin_lon,
                prefilter_reach_km(candidate.service_radius_km),
            )
            .contains(lat, lon)
        })
    }
}

/// Minimal artisan identity used by assignment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtisanSummary {
    pub id: ArtisanId,
    pub user_id: UserId,
    pub name: String,
    pub is_online: bool,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl ArtisanCandidate {
    /// Online artisans linked to the category, with coordinates present
    ///
    /// With an origin, the box test mirrors `get_bounding_box`: the
    /// longitude check is skipped when the box would cross a pole or the
    /// antimeridian.
    pub async fn find_eligible(query: &EligibleArtisanQuery, pool: &PgPool) -> Result<Vec<Self>> {
        let (origin_lat, origin_lon) = query.origin.unzip();

        let candidates = sqlx::query_as::<_, Self>(
            r#"
            SELECT
                a.id,
                a.name,
                a.photo_url,
                a.is_online,
                a.latitude,
                a.longitude,
                a.average_rating,
                a.service_radius_km,
                COALESCE(link.specialization_level, 1) AS specialization_level
            FROM artisans a
            INNER JOIN artisan_service_categories link
                ON link.artisan_id = a.id
               AND link.service_category_id = $1
            CROSS JOIN LATERAL (
                SELECT (a.service_radius_km * $4 + $5) / $6 AS lat_delta
            ) reach
            CROSS JOIN LATERAL (
                SELECT reach.lat_delta / GREATEST(cos(radians($2::float8)), 1e-12) AS lon_delta
            ) lon_reach
            WHERE a.is_online = TRUE
              AND a.latitude IS NOT NULL
              AND a.longitude IS NOT NULL
              AND (
                $2::float8 IS NULL
                OR (
                    a.latitude BETWEEN $2 - reach.lat_delta AND $2 + reach.lat_delta
                    AND (
                        $2 - reach.lat_delta < -90
                        OR $2 + reach.lat_delta > 90
                        OR $3::float8 - lon_reach.lon_delta < -180
                        OR $3::float8 + lon_reach.lon_delta > 180
                        OR a.longitude BETWEEN $3 - lon_reach.lon_delta AND $3 + lon_reach.lon_delta
                    )
                )
              )
            "#,
        )
        .bind(query.service_category_id)
        .bind(origin_lat)
        .bind(origin_lon)
        .bind(PREFILTER_SLACK_FACTOR)
        .bind(PREFILTER_SLACK_KM)
        .bind(KM_PER_DEGREE)
        .fetch_all(pool)
        .await?;

        Ok(candidates)
    }

    /// Active push tokens registered by the accounts behind these artisans
    pub async fn find_push_tokens(artisan_ids: &[ArtisanId], pool: &PgPool) -> Result<Vec<String>> {
        if artisan_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = artisan_ids.iter().map(|id| id.into_uuid()).collect();

        let tokens = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT t.token
            FROM notification_tokens t
            INNER JOIN artisans a ON a.user_id = t.user_id
            WHERE a.id = ANY($1)
              AND t.is_active = TRUE
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(tokens)
    }
}

impl ArtisanSummary {
    pub async fn find_by_id(id: ArtisanId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, user_id, name, is_online FROM artisans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
