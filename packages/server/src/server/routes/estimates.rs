use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};
use serde::Deserialize;

use crate::common::ServiceCategoryId;
use crate::domains::estimates::{get_cost_estimate, CostEstimate};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_auth, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateQuery {
    pub service_id: ServiceCategoryId,
}

/// GET /api/estimate?serviceId=...
pub async fn cost_estimate_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    query: Result<Query<EstimateQuery>, QueryRejection>,
) -> Result<Json<CostEstimate>, ApiError> {
    require_auth(auth)?;
    let Query(query) = query?;

    Ok(Json(get_cost_estimate(query.service_id, &state.deps).await?))
}
