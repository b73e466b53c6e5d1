use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{app::AppState, models::ScanRequest, services::ScanService, utils::ScanError};

/// Classify a submitted URL
/// POST /api/scan
pub async fn scan_url(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return ScanError::from(e).into_response();
    }

    let service = ScanService::new(&state);

    match service.scan(&request.url).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}
