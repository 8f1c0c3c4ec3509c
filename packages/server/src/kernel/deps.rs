//! Server dependencies for domain activities (using traits for testability)
//!
//! This module provides the central dependency container used by all domain activities.
//! All external services use trait abstractions to enable testing.

use std::sync::Arc;
use std::time::Duration;

use crate::common::ServiceCategoryId;
use crate::config::MatchingConfig;
use crate::domains::service_categories::models::ServiceCategory;
use crate::kernel::{BaseCache, BaseMarketplaceStore, BasePushNotificationService, TtlCache};

/// Cache of service categories keyed by id
pub type CategoryCache = dyn BaseCache<ServiceCategoryId, ServiceCategory>;

/// In-memory category cache; a zero TTL disables caching
pub fn ttl_category_cache(ttl: Duration) -> Arc<CategoryCache> {
    Arc::new(TtlCache::<ServiceCategoryId, ServiceCategory>::new(ttl))
}

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseMarketplaceStore>,
    pub push_service: Arc<dyn BasePushNotificationService>,
    pub category_cache: Arc<CategoryCache>,
    pub matching: MatchingConfig,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseMarketplaceStore>,
        push_service: Arc<dyn BasePushNotificationService>,
        category_cache: Arc<CategoryCache>,
        matching: MatchingConfig,
    ) -> Self {
        Self {
            store,
            push_service,
            category_cache,
            matching,
        }
    }
}
