// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use marketplace_core::common::utils::ExpoClient;
use marketplace_core::domains::auth::JwtService;
use marketplace_core::kernel::{ttl_category_cache, PgMarketplaceStore, ServerDeps};
use marketplace_core::server::{build_app, middleware::with_rate_limit};
use marketplace_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,marketplace_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Handyman Marketplace API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let deps = ServerDeps::new(
        Arc::new(PgMarketplaceStore::new(pool)),
        Arc::new(ExpoClient::new(config.expo_access_token.clone())),
        ttl_category_cache(config.category_cache_ttl),
        config.matching.clone(),
    );
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    // Build application
    let app = build_app(deps, jwt_service, &config.allowed_origins);
    let app = with_rate_limit(app, config.rate_limit_per_second, config.rate_limit_burst)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
