// Library exports for the PhishScan backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, Environment};
pub use db::{DieselPool, RedisConfig, RedisPool};
pub use models::{
    IntelProvider, RecentScan, ScanOutcome, ScanRequest, ScanResponse, StatsResponse, Verdict,
};
pub use services::{ScanCache, ScanRecorder, ScanService, VerdictConfig};
pub use utils::{normalize_url, Allowlist, ScanError};

use axum::{
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

/// Assemble the full application router with middleware attached.
/// One rate-limit window covers the whole /api surface.
pub fn build_router(state: AppState) -> Router {
    let rate_limit_state = middleware::RateLimitState {
        limiter: state.rate_limiter.clone(),
        trust_proxy: state.config.trust_proxy,
    };

    let api = Router::new()
        .merge(handlers::scan_routes())
        .nest("/admin", handlers::admin_routes())
        .route("/health", get(health_check))
        .layer(from_fn_with_state(
            rate_limit_state,
            middleware::rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::dynamic_cors_middleware,
        ))
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe
/// GET /
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "phishscan-backend",
        "status": "running"
    }))
}

/// Readiness probe covering both backing stores
/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut overall_healthy = true;
    let timestamp = chrono::Utc::now().to_rfc3339();

    // Check PostgreSQL
    let postgres_health = match db::check_diesel_health(&state.diesel_pool).await {
        Ok(_) => serde_json::json!({
            "status": "healthy",
            "error": null
        }),
        Err(e) => {
            overall_healthy = false;
            serde_json::json!({
                "status": "unhealthy",
                "error": format!("Database connection failed: {}", e)
            })
        },
    };

    // Check Redis; a missing pool is a configuration state, not a failure
    let redis_health = match state.redis_pool.as_ref() {
        Some(pool) => {
            let health = pool.health_check().await;
            if !health.is_healthy {
                overall_healthy = false;
            }
            serde_json::json!({
                "status": if health.is_healthy { "healthy" } else { "unhealthy" },
                "latency_ms": health.latency_ms,
                "error": health.error
            })
        },
        None => serde_json::json!({
            "status": "disabled",
            "error": null
        }),
    };

    let response = serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "phishscan-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health,
            "redis": redis_health
        }
    });

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
