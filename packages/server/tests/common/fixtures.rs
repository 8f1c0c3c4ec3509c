//! Test fixtures for seeding Postgres.
//!
//! Artisans, users and tokens have no write path in the crate, so they are
//! inserted with raw SQL. Jobs go through the model methods.

use anyhow::Result;
use marketplace_core::common::{ArtisanId, ServiceCategoryId, UserId};
use marketplace_core::domains::jobs::models::{Job, NewJob};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_test_user(pool: &PgPool) -> Result<UserId> {
    let id = UserId::new();
    sqlx::query("INSERT INTO users (id) VALUES ($1)")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(id)
}

/// Category with a unique name (the table enforces uniqueness)
pub async fn create_test_category(pool: &PgPool, name: &str) -> Result<ServiceCategoryId> {
    let id = ServiceCategoryId::new();
    sqlx::query("INSERT INTO service_categories (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(format!("{} {}", name, Uuid::new_v4()))
        .execute(pool)
        .await?;
    Ok(id)
}

/// Artisan row as seeded into the database
pub struct TestArtisan {
    pub name: &'static str,
    pub is_online: bool,
    pub location: Option<(f64, f64)>,
    pub rating: f64,
    pub radius_km: f64,
}

impl TestArtisan {
    pub fn online_at(name: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            is_online: true,
            location: Some((latitude, longitude)),
            rating: 4.0,
            radius_km: 10.0,
        }
    }
}

/// Insert an artisan with its own user account; returns (artisan, user)
pub async fn create_test_artisan(pool: &PgPool, artisan: TestArtisan) -> Result<(ArtisanId, UserId)> {
    let user_id = create_test_user(pool).await?;
    let id = ArtisanId::new();
    sqlx::query(
        r#"INSERT INTO artisans (id, user_id, name, is_online, latitude, longitude, average_rating, service_radius_km)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
    )
    .bind(id)
    .bind(user_id)
    .bind(artisan.name)
    .bind(artisan.is_online)
    .bind(artisan.location.map(|(lat, _)| lat))
    .bind(artisan.location.map(|(_, lon)| lon))
    .bind(artisan.rating)
    .bind(artisan.radius_km)
    .execute(pool)
    .await?;
    Ok((id, user_id))
}

pub async fn link_artisan_category(
    pool: &PgPool,
    artisan_id: ArtisanId,
    category_id: ServiceCategoryId,
    level: Option<i32>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO artisan_service_categories (artisan_id, service_category_id, specialization_level) VALUES ($1, $2, $3)",
    )
    .bind(artisan_id)
    .bind(category_id)
    .bind(level)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_test_token(pool: &PgPool, user_id: UserId, token: &str, active: bool) -> Result<()> {
    sqlx::query("INSERT INTO notification_tokens (id, user_id, token, is_active) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token)
        .bind(active)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn create_test_job(
    pool: &PgPool,
    user_id: UserId,
    category_id: ServiceCategoryId,
    latitude: f64,
    longitude: f64,
) -> Result<Job> {
    Job::insert(
        &NewJob {
            user_id,
            service_category_id: category_id,
            description: "Replace the bathroom water heater".to_string(),
            photo_urls: vec!["https://cdn.example.com/heater.jpg".to_string()],
            latitude,
            longitude,
            preferred_time: None,
            estimated_cost: Some(15_000.0),
        },
        pool,
    )
    .await
}
