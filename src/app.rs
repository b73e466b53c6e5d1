// Shared application state threaded through every handler.

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    app_config::AppConfig,
    db::{create_diesel_pool, DieselDatabaseConfig, DieselPool, RedisConfig, RedisPool},
    services::{RateLimiter, ScanCache},
    utils::allowlist::Allowlist,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub diesel_pool: DieselPool,
    pub redis_pool: Option<RedisPool>,
    pub scan_cache: ScanCache,
    pub rate_limiter: RateLimiter,
    pub allowlist: Arc<Allowlist>,
}

impl AppState {
    /// Build the full application state from configuration.
    /// Postgres is mandatory; Redis is optional and its absence only
    /// disables caching and throttling.
    pub async fn initialize(config: AppConfig) -> anyhow::Result<Self> {
        let db_config = DieselDatabaseConfig::from_app_config(&config);
        let diesel_pool = create_diesel_pool(db_config)
            .await
            .map_err(|e| anyhow::anyhow!("Database initialization failed: {}", e))?;
        info!("PostgreSQL connection pool established");

        let redis_pool = match config.redis_url.clone().map(RedisConfig::for_url) {
            Some(redis_config) => match RedisPool::new(redis_config).await {
                Ok(pool) => {
                    info!("Redis connected, caching and rate limiting enabled");
                    Some(pool)
                },
                Err(e) => {
                    warn!("Redis unavailable, continuing without cache: {}", e);
                    None
                },
            },
            None => {
                warn!("REDIS_URL not set, caching and rate limiting disabled");
                None
            },
        };

        let scan_cache = ScanCache::new(redis_pool.clone(), config.scan_cache_ttl_seconds);
        let rate_limiter = RateLimiter::new(
            redis_pool.clone(),
            config.rate_limit_max_requests,
            u64::from(config.rate_limit_window_seconds),
        );

        Ok(Self {
            config: Arc::new(config),
            diesel_pool,
            redis_pool,
            scan_cache,
            rate_limiter,
            allowlist: Arc::new(Allowlist::default()),
        })
    }
}
