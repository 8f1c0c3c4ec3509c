// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (ranking, logging policy, notification policy) lives in
// domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMarketplaceStore)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::{ArtisanId, JobId, ServiceCategoryId};
use crate::domains::jobs::models::{Job, JobPatch, NewJob};
use crate::domains::matching::models::{
    ArtisanCandidate, ArtisanSummary, EligibleArtisanQuery, JobMatchingLog, MatchingAnalytics,
    NewMatchingLog,
};
use crate::domains::service_categories::models::ServiceCategory;

// =============================================================================
// Persistence Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseMarketplaceStore: Send + Sync {
    /// Cheap connectivity probe used by the health endpoint
    async fn ping(&self) -> Result<()>;

    async fn find_job_by_id(&self, id: JobId) -> Result<Option<Job>>;

    /// Persist a new job in PENDING
    async fn create_job(&self, new_job: NewJob) -> Result<Job>;

    /// Apply a partial update; `None` when the job does not exist
    async fn update_job(&self, id: JobId, patch: JobPatch) -> Result<Option<Job>>;

    async fn find_service_category(&self, id: ServiceCategoryId)
        -> Result<Option<ServiceCategory>>;

    async fn find_artisan(&self, id: ArtisanId) -> Result<Option<ArtisanSummary>>;

    /// Online artisans with both coordinates set and a link to the category
    async fn find_eligible_artisans(
        &self,
        query: EligibleArtisanQuery,
    ) -> Result<Vec<ArtisanCandidate>>;

    /// Write all rows of one matching run at once; returns rows written
    async fn bulk_insert_matching_logs(&self, rows: Vec<NewMatchingLog>) -> Result<u64>;

    async fn find_push_tokens(&self, artisan_ids: &[ArtisanId]) -> Result<Vec<String>>;

    async fn matching_analytics(&self) -> Result<MatchingAnalytics>;

    async fn find_matching_logs(&self, job_id: JobId) -> Result<Vec<JobMatchingLog>>;
}

// =============================================================================
// Push Notification Trait (Infrastructure)
// =============================================================================

/// Content of one push notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

#[async_trait]
pub trait BasePushNotificationService: Send + Sync {
    /// Send the same notification to every token in one request
    async fn send_multicast(&self, tokens: &[String], payload: PushPayload) -> Result<()>;
}

// =============================================================================
// Cache Trait (Infrastructure)
// =============================================================================

/// Key/value cache injected into components that would otherwise keep
/// process-wide state
pub trait BaseCache<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;

    fn set(&self, key: K, value: V);

    /// Drop the entry for `key`, if any
    fn expire(&self, key: &K);
}
