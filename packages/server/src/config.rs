use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub expo_access_token: Option<String>,
    pub allowed_origins: Vec<String>,
    pub category_cache_ttl: Duration,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    pub matching: MatchingConfig,
}

/// Tunables for the job-to-artisan matching pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    /// Top-K used when the caller passes no limit or a non-positive one
    pub default_limit: usize,
    /// Upper clamp for caller-provided limits
    pub max_limit: usize,
    pub query_timeout: Duration,
    pub notification_timeout: Duration,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 50,
            query_timeout: Duration::from_secs(10),
            notification_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = MatchingConfig::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "handyman-marketplace".to_string()),
            expo_access_token: env::var("EXPO_ACCESS_TOKEN").ok(),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            category_cache_ttl: Duration::from_secs(read_u64("CATEGORY_CACHE_TTL_SECS", 300)?),
            rate_limit_per_second: read_u64("RATE_LIMIT_PER_SECOND", 10)?,
            rate_limit_burst: u32::try_from(read_u64("RATE_LIMIT_BURST", 20)?)
                .context("RATE_LIMIT_BURST is too large")?,
            matching: MatchingConfig {
                default_limit: read_u64("MATCHING_DEFAULT_LIMIT", defaults.default_limit as u64)?
                    as usize,
                max_limit: read_u64("MATCHING_MAX_LIMIT", defaults.max_limit as u64)? as usize,
                query_timeout: Duration::from_secs(read_u64("MATCHING_QUERY_TIMEOUT_SECS", 10)?),
                notification_timeout: Duration::from_secs(read_u64(
                    "NOTIFICATION_TIMEOUT_SECS",
                    10,
                )?),
            },
        })
    }
}

fn read_u64(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(v) => v
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}
