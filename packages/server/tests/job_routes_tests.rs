//! HTTP surface tests: router + JWT middleware over in-memory dependencies

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use marketplace_core::common::{ArtisanId, Role, ServiceCategoryId, UserId};
use marketplace_core::domains::auth::JwtService;
use marketplace_core::domains::jobs::{Job, JobStatus};
use marketplace_core::kernel::{ArtisanSeed, TestDependencies};
use marketplace_core::server::build_app;
use serde_json::{json, Value};
use tower::ServiceExt;

const JOB_LAT: f64 = 6.5244;
const JOB_LON: f64 = 3.3792;

struct TestApp {
    deps: TestDependencies,
    jwt: Arc<JwtService>,
    category: ServiceCategoryId,
    customer: UserId,
}

impl TestApp {
    fn new() -> Self {
        let deps = TestDependencies::new();
        let category = deps.store.add_category("Plumbing").id;
        Self {
            deps,
            jwt: Arc::new(JwtService::new("route-test-secret", "route-tests".to_string())),
            category,
            customer: UserId::new(),
        }
    }

    fn router(&self) -> Router {
        build_app(self.deps.server_deps(), self.jwt.clone(), &[])
    }

    fn token(&self, user_id: UserId, role: Role, artisan_id: Option<ArtisanId>) -> String {
        self.jwt.create_token(user_id, role, artisan_id).unwrap()
    }

    fn customer_token(&self) -> String {
        self.token(self.customer, Role::Customer, None)
    }

    fn admin_token(&self) -> String {
        self.token(UserId::new(), Role::Admin, None)
    }

    fn stranger_token(&self) -> String {
        self.token(UserId::new(), Role::Customer, None)
    }

    fn seed_job(&self) -> Job {
        self.deps
            .store
            .seed_job(self.customer, self.category, JOB_LAT, JOB_LON)
    }

    fn seed_artisan(&self) -> ArtisanId {
        self.deps.store.add_artisan(
            ArtisanSeed::new("Ada")
                .at(6.5245, 3.3793)
                .rating(4.5)
                .serves(self.category, 4),
        )
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn job_body(&self, latitude: f64) -> Value {
        json!({
            "serviceCategoryId": self.category,
            "description": "Bathroom tap will not stop dripping",
            "latitude": latitude,
            "longitude": JOB_LON,
        })
    }
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

// =============================================================================
// POST /api/jobs
// =============================================================================

#[tokio::test]
async fn create_job_returns_201_with_matches() {
    let app = TestApp::new();
    let artisan = app.seed_artisan();
    let token = app.customer_token();

    let (status, body) = app
        .send(Method::POST, "/api/jobs", Some(&token), Some(app.job_body(JOB_LAT)))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["job"]["status"], "PENDING");
    assert_eq!(body["job"]["userId"], app.customer.to_string());
    assert_eq!(body["matching"]["matches"][0]["artisanId"], artisan.to_string());
    assert_eq!(body["matching"]["matches"][0]["matchScore"], 19.98);
    assert!(body.get("matchingError").is_none());
}

#[tokio::test]
async fn create_job_requires_authentication() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/api/jobs", None, Some(app.job_body(JOB_LAT)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert!(app.deps.store.jobs().is_empty());
}

#[tokio::test]
async fn invalid_token_is_treated_as_anonymous() {
    let app = TestApp::new();
    let (status, _) = app
        .send(Method::POST, "/api/jobs", Some("not-a-jwt"), Some(app.job_body(JOB_LAT)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_job_with_out_of_range_latitude_is_400() {
    let app = TestApp::new();
    app.seed_artisan();
    let token = app.customer_token();

    let (status, body) = app
        .send(Method::POST, "/api/jobs", Some(&token), Some(app.job_body(100.0)))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_INPUT");
    assert_eq!(app.deps.store.job_write_count(), 0);
    assert!(app.deps.store.logs().is_empty());
}

#[tokio::test]
async fn create_job_with_malformed_body_is_400() {
    let app = TestApp::new();
    let token = app.customer_token();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/jobs",
            Some(&token),
            Some(json!({ "serviceCategoryId": "not-a-uuid", "latitude": 6.5 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_BODY");
}

#[tokio::test]
async fn create_job_with_unknown_category_is_404() {
    let app = TestApp::new();
    let token = app.customer_token();
    let mut body = app.job_body(JOB_LAT);
    body["serviceCategoryId"] = json!(ServiceCategoryId::new());

    let (status, response) = app
        .send(Method::POST, "/api/jobs", Some(&token), Some(body))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "NOT_FOUND");
}

// =============================================================================
// GET /api/jobs/:job_id and /matches
// =============================================================================

#[tokio::test]
async fn job_is_visible_to_owner_only() {
    let app = TestApp::new();
    let job = app.seed_job();
    let uri = format!("/api/jobs/{}", job.id);

    let (status, body) = app
        .send(Method::GET, &uri, Some(&app.customer_token()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], job.id.to_string());

    let (status, body) = app
        .send(Method::GET, &uri, Some(&app.stranger_token()), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, _) = app
        .send(Method::GET, &uri, Some(&app.admin_token()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_or_malformed_job_id() {
    let app = TestApp::new();
    let token = app.customer_token();

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/jobs/{}", marketplace_core::common::JobId::new()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(Method::GET, "/api/jobs/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_PATH");
}

#[tokio::test]
async fn matches_endpoint_returns_ranked_list() {
    let app = TestApp::new();
    let artisan = app.seed_artisan();
    let job = app.seed_job();

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/jobs/{}/matches?limit=0", job.id),
            Some(&app.customer_token()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobId"], job.id.to_string());
    assert_eq!(body["matches"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["matches"][0]["artisanId"], artisan.to_string());
}

#[tokio::test]
async fn matches_endpoint_checks_ownership() {
    let app = TestApp::new();
    let job = app.seed_job();
    let uri = format!("/api/jobs/{}/matches", job.id);

    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, &uri, Some(&app.stranger_token()), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.deps.store.candidate_queries().is_empty());
}

#[tokio::test]
async fn matches_endpoint_rejects_non_numeric_limit() {
    let app = TestApp::new();
    let job = app.seed_job();

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/jobs/{}/matches?limit=many", job.id),
            Some(&app.customer_token()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_QUERY");
}

// =============================================================================
// PUT /api/jobs/:job_id/status and POST /assign
// =============================================================================

#[tokio::test]
async fn unknown_status_value_is_400() {
    let app = TestApp::new();
    let job = app.seed_job();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/jobs/{}/status", job.id),
            Some(&app.customer_token()),
            Some(json!({ "status": "DONE" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_INPUT");
    assert_eq!(app.deps.store.job(job.id).unwrap().status, JobStatus::Pending);
}

#[tokio::test]
async fn completed_job_cannot_go_back_to_pending() {
    let app = TestApp::new();
    let mut job = app.seed_job();
    job.status = JobStatus::Completed;
    job.completed_at = Some(Utc::now());
    app.deps.store.insert_job(job.clone());

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/jobs/{}/status", job.id),
            Some(&app.customer_token()),
            Some(json!({ "status": "PENDING" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_TRANSITION");
    let stored = app.deps.store.job(job.id).unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert!(stored.completed_at.is_some());
}

#[tokio::test]
async fn owner_can_cancel_pending_job() {
    let app = TestApp::new();
    let job = app.seed_job();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/jobs/{}/status", job.id),
            Some(&app.customer_token()),
            Some(json!({ "status": "cancelled" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");
    assert!(body["completedAt"].is_null());
}

#[tokio::test]
async fn assigned_artisan_drives_job_to_completion() {
    let app = TestApp::new();
    let artisan = app.seed_artisan();
    let job = app.seed_job();

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/jobs/{}/assign", job.id),
            Some(&app.customer_token()),
            Some(json!({ "artisanId": artisan })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ASSIGNED");
    assert_eq!(body["assignedArtisanId"], artisan.to_string());

    let artisan_token = app.token(UserId::new(), Role::Artisan, Some(artisan));
    let uri = format!("/api/jobs/{}/status", job.id);

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&artisan_token), Some(json!({ "status": "IN_PROGRESS" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "IN_PROGRESS");

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&artisan_token), Some(json!({ "status": "COMPLETED" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "COMPLETED");
    assert!(body["completedAt"].is_string());
}

#[tokio::test]
async fn status_endpoint_does_not_assign() {
    let app = TestApp::new();
    let job = app.seed_job();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/jobs/{}/status", job.id),
            Some(&app.customer_token()),
            Some(json!({ "status": "ASSIGNED" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[tokio::test]
async fn status_write_loses_to_a_concurrent_change() {
    let app = TestApp::new();
    let mut job = app.seed_job();
    job.status = JobStatus::InProgress;
    app.deps.store.insert_job(job.clone());

    // Someone cancels between our read and our write
    app.deps.store.race_next_update(JobStatus::Cancelled);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/jobs/{}/status", job.id),
            Some(&app.customer_token()),
            Some(json!({ "status": "COMPLETED" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_TRANSITION");
    let stored = app.deps.store.job(job.id).unwrap();
    assert_eq!(stored.status, JobStatus::Cancelled);
    assert!(stored.completed_at.is_none());
}

#[tokio::test]
async fn assignment_loses_to_a_concurrent_cancel() {
    let app = TestApp::new();
    let artisan = app.seed_artisan();
    let job = app.seed_job();
    app.deps.store.race_next_update(JobStatus::Cancelled);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/jobs/{}/assign", job.id),
            Some(&app.customer_token()),
            Some(json!({ "artisanId": artisan })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_TRANSITION");
    let stored = app.deps.store.job(job.id).unwrap();
    assert_eq!(stored.status, JobStatus::Cancelled);
    assert!(stored.assigned_artisan_id.is_none());
}

#[tokio::test]
async fn assign_checks_ownership_and_artisan() {
    let app = TestApp::new();
    let artisan = app.seed_artisan();
    let job = app.seed_job();
    let uri = format!("/api/jobs/{}/assign", job.id);

    let (status, _) = app
        .send(
            Method::POST,
            &uri,
            Some(&app.stranger_token()),
            Some(json!({ "artisanId": artisan })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::POST,
            &uri,
            Some(&app.customer_token()),
            Some(json!({ "artisanId": ArtisanId::new() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.deps.store.job(job.id).unwrap().status, JobStatus::Pending);
}

// =============================================================================
// Admin analytics
// =============================================================================

#[tokio::test]
async fn analytics_is_admin_only() {
    let app = TestApp::new();
    app.seed_artisan();
    let token = app.customer_token();
    app.send(Method::POST, "/api/jobs", Some(&token), Some(app.job_body(JOB_LAT)))
        .await;

    let (status, _) = app
        .send(Method::GET, "/api/jobs/analytics/matching", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::GET,
            "/api/jobs/analytics/matching",
            Some(&app.admin_token()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalEvaluations"], 1);
    assert_eq!(body["selectedCount"], 1);
    assert_eq!(body["jobsMatched"], 1);
}

#[tokio::test]
async fn matching_logs_for_admin() {
    let app = TestApp::new();
    app.seed_artisan();
    let (_, created) = app
        .send(
            Method::POST,
            "/api/jobs",
            Some(&app.customer_token()),
            Some(app.job_body(JOB_LAT)),
        )
        .await;
    let job_id = created["job"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/jobs/{}/matching-logs", job_id);

    let (status, _) = app
        .send(Method::GET, &uri, Some(&app.customer_token()), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::GET, &uri, Some(&app.admin_token()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let logs = body.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["isSelected"], true);
}

// =============================================================================
// GET /api/estimate
// =============================================================================

#[tokio::test]
async fn estimate_has_range_and_confidence() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/estimate?serviceId={}", app.category),
            Some(&app.customer_token()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serviceName"], "Plumbing");
    assert_eq!(body["currency"], "NGN");
    let min = body["minCost"].as_f64().unwrap();
    let max = body["maxCost"].as_f64().unwrap();
    assert!(min > 0.0 && min <= max);
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.7..=0.9).contains(&confidence));
    assert!(!body["factors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn estimate_errors() {
    let app = TestApp::new();
    let token = app.customer_token();

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/estimate?serviceId={}", ServiceCategoryId::new()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(Method::GET, "/api/estimate", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_QUERY");
}
