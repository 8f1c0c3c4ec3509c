use anyhow::Result;
use tracing::debug;

use super::models::ServiceCategory;
use crate::common::ServiceCategoryId;
use crate::kernel::ServerDeps;

/// Look up a category through the injected cache, falling back to the store.
///
/// Misses are not cached so a newly added category becomes visible at once.
pub async fn find_service_category(
    id: ServiceCategoryId,
    deps: &ServerDeps,
) -> Result<Option<ServiceCategory>> {
    if let Some(category) = deps.category_cache.get(&id) {
        debug!(category_id = %id, "Service category cache hit");
        return Ok(Some(category));
    }

    let category = deps.store.find_service_category(id).await?;
    if let Some(category) = &category {
        deps.category_cache.set(id, category.clone());
    }
    Ok(category)
}
