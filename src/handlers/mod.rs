pub mod admin;
pub mod scan;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};

// Scan routes
pub fn scan_routes() -> Router<AppState> {
    Router::new().route("/scan", post(scan::scan_url))
}

// Admin dashboard routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route("/recent", get(admin::recent))
}
