//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domains::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    assign_artisan_handler, cost_estimate_handler, create_job_handler, get_job_handler,
    get_job_matches_handler, get_matching_logs_handler, health_handler,
    matching_analytics_handler, update_job_status_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // "*" anywhere in the list means any origin
    if allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    // No configured origins: allow any (development)
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Build the Axum application router
pub fn build_app(
    deps: ServerDeps,
    jwt_service: Arc<JwtService>,
    allowed_origins: &[String],
) -> Router {
    let app_state = AppState {
        deps: Arc::new(deps),
        jwt_service: jwt_service.clone(),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/jobs", post(create_job_handler))
        .route("/api/jobs/analytics/matching", get(matching_analytics_handler))
        .route("/api/jobs/:job_id", get(get_job_handler))
        .route("/api/jobs/:job_id/matches", get(get_job_matches_handler))
        .route("/api/jobs/:job_id/status", put(update_job_status_handler))
        .route("/api/jobs/:job_id/assign", post(assign_artisan_handler))
        .route(
            "/api/jobs/:job_id/matching-logs",
            get(get_matching_logs_handler),
        )
        .route("/api/estimate", get(cost_estimate_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        })) // JWT authentication
        .layer(Extension(app_state)) // Add shared state (must be after middlewares that need it)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
