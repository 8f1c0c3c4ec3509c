// Rate limiting middleware using tower-governor
//
// Keyed by peer IP, so the server must be served with connect info.
// Applied in main.rs only; tests drive the router without a peer address.

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

/// Wrap the router in a per-IP token bucket
pub fn with_rate_limit(router: Router, per_second: u64, burst_size: u32) -> Result<Router> {
    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .use_headers() // x-ratelimit-* response headers; the key stays the peer IP
            .finish()
            .context("rate limit must have a non-zero rate and burst size")?,
    );

    Ok(router.layer(GovernorLayer { config }))
}
