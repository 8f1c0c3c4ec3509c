//! Postgres-backed `BaseMarketplaceStore`
//!
//! Thin adapter: every query lives on the model types, this only routes
//! trait calls to them.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{ArtisanId, JobId, ServiceCategoryId};
use crate::domains::jobs::models::{Job, JobPatch, NewJob};
use crate::domains::matching::models::{
    ArtisanCandidate, ArtisanSummary, EligibleArtisanQuery, JobMatchingLog, MatchingAnalytics,
    NewMatchingLog,
};
use crate::domains::service_categories::models::ServiceCategory;
use crate::kernel::BaseMarketplaceStore;

#[derive(Clone)]
pub struct PgMarketplaceStore {
    pool: PgPool,
}

impl PgMarketplaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseMarketplaceStore for PgMarketplaceStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_job_by_id(&self, id: JobId) -> Result<Option<Job>> {
        Job::find_by_id(id, &self.pool).await
    }

    async fn create_job(&self, new_job: NewJob) -> Result<Job> {
        Job::insert(&new_job, &self.pool).await
    }

    async fn update_job(&self, id: JobId, patch: JobPatch) -> Result<Option<Job>> {
        Job::update(id, &patch, &self.pool).await
    }

    async fn find_service_category(
        &self,
        id: ServiceCategoryId,
    ) -> Result<Option<ServiceCategory>> {
        ServiceCategory::find_by_id(id, &self.pool).await
    }

    async fn find_artisan(&self, id: ArtisanId) -> Result<Option<ArtisanSummary>> {
        ArtisanSummary::find_by_id(id, &self.pool).await
    }

    async fn find_eligible_artisans(
        &self,
        query: EligibleArtisanQuery,
    ) -> Result<Vec<ArtisanCandidate>> {
        ArtisanCandidate::find_eligible(&query, &self.pool).await
    }

    async fn bulk_insert_matching_logs(&self, rows: Vec<NewMatchingLog>) -> Result<u64> {
        JobMatchingLog::insert_many(&rows, &self.pool).await
    }

    async fn find_push_tokens(&self, artisan_ids: &[ArtisanId]) -> Result<Vec<String>> {
        ArtisanCandidate::find_push_tokens(artisan_ids, &self.pool).await
    }

    async fn matching_analytics(&self) -> Result<MatchingAnalytics> {
        MatchingAnalytics::compute(&self.pool).await
    }

    async fn find_matching_logs(&self, job_id: JobId) -> Result<Vec<JobMatchingLog>> {
        JobMatchingLog::find_by_job(job_id, &self.pool).await
    }
}
