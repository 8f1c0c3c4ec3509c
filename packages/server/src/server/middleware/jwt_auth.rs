use crate::common::{Actor, ArtisanId, AuthError, Role, UserId};
use crate::domains::auth::JwtService;
use axum::{extract::Extension, middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// Authenticated user information from JWT
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub role: Role,
    pub artisan_id: Option<ArtisanId>,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role, self.artisan_id)
    }
}

/// Handler-side guard: the caller must have presented a valid token
pub fn require_auth(auth: Option<Extension<AuthUser>>) -> Result<Actor, AuthError> {
    auth.map(|Extension(user)| user.actor())
        .ok_or(AuthError::AuthenticationRequired)
}

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds AuthUser to request extensions.
/// If no token or invalid token, request continues without AuthUser; handlers decide.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &jwt_service);

    if let Some(user) = auth_user {
        debug!("Authenticated user: {} (role: {:?})", user.user_id, user.role);
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    // Get Authorization header
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    // Verify token
    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: claims.user_id,
        role: claims.role,
        artisan_id: claims.artisan_id,
    })
}
