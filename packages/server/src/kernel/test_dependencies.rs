// TestDependencies - in-memory implementations for testing
//
// Provides an in-memory store and a spy push service that can be injected
// into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{
    ttl_category_cache, BaseMarketplaceStore, BasePushNotificationService, PushPayload, ServerDeps,
};
use crate::common::{ArtisanId, JobId, ServiceCategoryId, UserId};
use crate::config::MatchingConfig;
use crate::domains::jobs::models::{Job, JobPatch, JobStatus, NewJob};
use crate::domains::matching::models::{
    ArtisanCandidate, ArtisanSummary, EligibleArtisanQuery, JobMatchingLog, MatchingAnalytics,
    NewMatchingLog,
};
use crate::domains::service_categories::models::ServiceCategory;

// =============================================================================
// Artisan seed
// =============================================================================

/// Artisan to be placed in the in-memory store
#[derive(Debug, Clone)]
pub struct ArtisanSeed {
    pub id: ArtisanId,
    pub user_id: UserId,
    pub name: String,
    pub photo_url: Option<String>,
    pub is_online: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub average_rating: f64,
    pub service_radius_km: f64,
    /// Category links; `None` level mimics a link row without a level
    pub categories: Vec<(ServiceCategoryId, Option<i32>)>,
}

impl ArtisanSeed {
    /// Online artisan without coordinates, rating 0, 10 km radius
    pub fn new(name: &str) -> Self {
        Self {
            id: ArtisanId::new(),
            user_id: UserId::new(),
            name: name.to_string(),
            photo_url: None,
            is_online: true,
            latitude: None,
            longitude: None,
            average_rating: 0.0,
            service_radius_km: 10.0,
            categories: Vec::new(),
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.average_rating = rating;
        self
    }

    pub fn radius(mut self, km: f64) -> Self {
        self.service_radius_km = km;
        self
    }

    pub fn offline(mut self) -> Self {
        self.is_online = false;
        self
    }

    pub fn serves(mut self, category: ServiceCategoryId, level: i32) -> Self {
        self.categories.push((category, Some(level)));
        self
    }

    pub fn serves_without_level(mut self, category: ServiceCategoryId) -> Self {
        self.categories.push((category, None));
        self
    }

    fn candidate_for(&self, category: ServiceCategoryId) -> Option<ArtisanCandidate> {
        let (_, level) = self.categories.iter().find(|(c, _)| *c == category)?;
        Some(ArtisanCandidate {
            id: self.id,
            name: self.name.clone(),
            photo_url: self.photo_url.clone(),
            is_online: self.is_online,
            latitude: self.latitude,
            longitude: self.longitude,
            average_rating: self.average_rating,
            service_radius_km: self.service_radius_km,
            specialization_level: level.unwrap_or(1),
        })
    }
}

// =============================================================================
// In-memory Marketplace Store
// =============================================================================

pub struct InMemoryMarketplaceStore {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    categories: Arc<Mutex<HashMap<ServiceCategoryId, ServiceCategory>>>,
    artisans: Arc<Mutex<Vec<ArtisanSeed>>>,
    push_tokens: Arc<Mutex<HashMap<ArtisanId, Vec<String>>>>,
    logs: Arc<Mutex<Vec<JobMatchingLog>>>,
    candidate_queries: Arc<Mutex<Vec<EligibleArtisanQuery>>>,
    job_writes: Arc<Mutex<usize>>,
    /// Status another writer sets just before the next `update_job`
    racing_status: Arc<Mutex<Option<JobStatus>>>,
    fail_log_writes: AtomicBool,
    fail_candidate_query: AtomicBool,
    fail_token_lookup: AtomicBool,
}

impl InMemoryMarketplaceStore {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            categories: Arc::new(Mutex::new(HashMap::new())),
            artisans: Arc::new(Mutex::new(Vec::new())),
            push_tokens: Arc::new(Mutex::new(HashMap::new())),
            logs: Arc::new(Mutex::new(Vec::new())),
            candidate_queries: Arc::new(Mutex::new(Vec::new())),
            job_writes: Arc::new(Mutex::new(0)),
            racing_status: Arc::new(Mutex::new(None)),
            fail_log_writes: AtomicBool::new(false),
            fail_candidate_query: AtomicBool::new(false),
            fail_token_lookup: AtomicBool::new(false),
        }
    }

    /// Make every `bulk_insert_matching_logs` call fail
    pub fn with_failing_log_writes(self) -> Self {
        self.fail_log_writes.store(true, Ordering::SeqCst);
        self
    }

    /// Make every `find_eligible_artisans` call fail
    pub fn with_failing_candidate_query(self) -> Self {
        self.fail_candidate_query.store(true, Ordering::SeqCst);
        self
    }

    /// Make every `find_push_tokens` call fail
    pub fn with_failing_token_lookup(self) -> Self {
        self.fail_token_lookup.store(true, Ordering::SeqCst);
        self
    }

    /// Move the target job to `status` right before the next `update_job`
    /// lands, as a concurrent request would
    pub fn race_next_update(&self, status: JobStatus) {
        *self.racing_status.lock().unwrap() = Some(status);
    }

    pub fn add_category(&self, name: &str) -> ServiceCategory {
        let category = ServiceCategory {
            id: ServiceCategoryId::new(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
        };
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category.clone());
        category
    }

    pub fn add_artisan(&self, seed: ArtisanSeed) -> ArtisanId {
        let id = seed.id;
        self.artisans.lock().unwrap().push(seed);
        id
    }

    pub fn add_push_token(&self, artisan_id: ArtisanId, token: &str) {
        self.push_tokens
            .lock()
            .unwrap()
            .entry(artisan_id)
            .or_default()
            .push(token.to_string());
    }

    /// Store a job directly, bypassing `create_job`
    pub fn insert_job(&self, job: Job) {
        self.jobs.lock().unwrap().insert(job.id, job);
    }

    /// Build a PENDING job at the given location without touching the write counter
    pub fn seed_job(
        &self,
        user_id: UserId,
        category: ServiceCategoryId,
        latitude: f64,
        longitude: f64,
    ) -> Job {
        let now = Utc::now();
        let job = Job {
            id: JobId::new(),
            user_id,
            service_category_id: category,
            description: "Fix a leaking pipe under the kitchen sink".to_string(),
            photo_urls: Vec::new(),
            latitude,
            longitude,
            preferred_time: None,
            status: JobStatus::Pending,
            estimated_cost: None,
            actual_cost: None,
            assigned_artisan_id: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.insert_job(job.clone());
        job
    }

    pub fn job(&self, id: JobId) -> Option<Job> {
        self.jobs.lock().unwrap().get(&id).cloned()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().values().cloned().collect()
    }

    /// Number of `create_job` / `update_job` calls that wrote something
    pub fn job_write_count(&self) -> usize {
        *self.job_writes.lock().unwrap()
    }

    pub fn logs(&self) -> Vec<JobMatchingLog> {
        self.logs.lock().unwrap().clone()
    }

    pub fn logs_for(&self, job_id: JobId) -> Vec<JobMatchingLog> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.job_id == job_id)
            .cloned()
            .collect()
    }

    pub fn candidate_queries(&self) -> Vec<EligibleArtisanQuery> {
        self.candidate_queries.lock().unwrap().clone()
    }
}

impl Default for InMemoryMarketplaceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMarketplaceStore for InMemoryMarketplaceStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_job_by_id(&self, id: JobId) -> Result<Option<Job>> {
        Ok(self.job(id))
    }

    async fn create_job(&self, new_job: NewJob) -> Result<Job> {
        let now = Utc::now();
        let job = Job {
            id: JobId::new(),
            user_id: new_job.user_id,
            service_category_id: new_job.service_category_id,
            description: new_job.description,
            photo_urls: new_job.photo_urls,
            latitude: new_job.latitude,
            longitude: new_job.longitude,
            preferred_time: new_job.preferred_time,
            status: JobStatus::Pending,
            estimated_cost: new_job.estimated_cost,
            actual_cost: None,
            assigned_artisan_id: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.insert_job(job.clone());
        *self.job_writes.lock().unwrap() += 1;
        Ok(job)
    }

    async fn update_job(&self, id: JobId, patch: JobPatch) -> Result<Option<Job>> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = self.racing_status.lock().unwrap().take() {
            job.status = status;
        }
        if !patch.applies_to(job) {
            return Ok(None);
        }
        patch.apply(job, Utc::now());
        *self.job_writes.lock().unwrap() += 1;
        Ok(Some(job.clone()))
    }

    async fn find_service_category(
        &self,
        id: ServiceCategoryId,
    ) -> Result<Option<ServiceCategory>> {
        Ok(self.categories.lock().unwrap().get(&id).cloned())
    }

    async fn find_artisan(&self, id: ArtisanId) -> Result<Option<ArtisanSummary>> {
        Ok(self
            .artisans
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .map(|a| ArtisanSummary {
                id: a.id,
                user_id: a.user_id,
                name: a.name.clone(),
                is_online: a.is_online,
            }))
    }

    async fn find_eligible_artisans(
        &self,
        query: EligibleArtisanQuery,
    ) -> Result<Vec<ArtisanCandidate>> {
        self.candidate_queries.lock().unwrap().push(query);
        if self.fail_candidate_query.load(Ordering::SeqCst) {
            return Err(anyhow!("candidate query failed (simulated)"));
        }

        Ok(self
            .artisans
            .lock()
            .unwrap()
            .iter()
            .filter_map(|a| a.candidate_for(query.service_category_id))
            .filter(|c| query.admits(c))
            .collect())
    }

    async fn bulk_insert_matching_logs(&self, rows: Vec<NewMatchingLog>) -> Result<u64> {
        if self.fail_log_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("matching log write failed (simulated)"));
        }

        let now = Utc::now();
        let written = rows.len() as u64;
        self.logs
            .lock()
            .unwrap()
            .extend(rows.into_iter().map(|row| row.into_log(now)));
        Ok(written)
    }

    async fn find_push_tokens(&self, artisan_ids: &[ArtisanId]) -> Result<Vec<String>> {
        if self.fail_token_lookup.load(Ordering::SeqCst) {
            return Err(anyhow!("push token lookup failed (simulated)"));
        }

        let tokens = self.push_tokens.lock().unwrap();
        Ok(artisan_ids
            .iter()
            .filter_map(|id| tokens.get(id))
            .flatten()
            .cloned()
            .collect())
    }

    async fn matching_analytics(&self) -> Result<MatchingAnalytics> {
        Ok(MatchingAnalytics::from_logs(&self.logs()))
    }

    async fn find_matching_logs(&self, job_id: JobId) -> Result<Vec<JobMatchingLog>> {
        let mut logs = self.logs_for(job_id);
        logs.sort_by(|a, b| {
            b.match_score
                .total_cmp(&a.match_score)
                .then_with(|| a.distance_km.total_cmp(&b.distance_km))
        });
        Ok(logs)
    }
}

// =============================================================================
// Spy Push Notification Service
// =============================================================================

/// Arguments captured from a multicast call
#[derive(Debug, Clone, PartialEq)]
pub struct MulticastCall {
    pub tokens: Vec<String>,
    pub payload: PushPayload,
}

pub struct SpyPushNotificationService {
    calls: Arc<Mutex<Vec<MulticastCall>>>,
    fail: AtomicBool,
    delay: Option<Duration>,
}

impl SpyPushNotificationService {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: AtomicBool::new(false),
            delay: None,
        }
    }

    /// Record the call, then fail it
    pub fn failing() -> Self {
        let spy = Self::new();
        spy.fail.store(true, Ordering::SeqCst);
        spy
    }

    /// Sleep before answering (for timeout tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<MulticastCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for SpyPushNotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePushNotificationService for SpyPushNotificationService {
    async fn send_multicast(&self, tokens: &[String], payload: PushPayload) -> Result<()> {
        self.calls.lock().unwrap().push(MulticastCall {
            tokens: tokens.to_vec(),
            payload,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("push delivery failed (simulated)"));
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub store: Arc<InMemoryMarketplaceStore>,
    pub push_service: Arc<SpyPushNotificationService>,
    pub matching: MatchingConfig,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryMarketplaceStore::new()),
            push_service: Arc::new(SpyPushNotificationService::new()),
            matching: MatchingConfig::default(),
        }
    }

    /// Set an in-memory store
    pub fn mock_store(mut self, store: InMemoryMarketplaceStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Set a spy push notification service
    pub fn mock_push(mut self, service: SpyPushNotificationService) -> Self {
        self.push_service = Arc::new(service);
        self
    }

    pub fn with_matching(mut self, matching: MatchingConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Convert into ServerDeps for testing
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            self.push_service.clone(),
            ttl_category_cache(Duration::from_secs(60)),
            self.matching.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
