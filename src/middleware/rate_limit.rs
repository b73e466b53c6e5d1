// Per-client throttling for the API surface.
// The client identity is the peer address, or the leftmost
// X-Forwarded-For entry when the deployment trusts its reverse proxy.
// Counters live in Redis; quota and window come from configuration.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header::HeaderValue, HeaderMap, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::warn;

use crate::services::{RateLimitDecision, RateLimiter};

/// State carried by the rate-limit layer, detached from the rest of
/// AppState so the middleware can be exercised on its own.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: RateLimiter,
    pub trust_proxy: bool,
}

/// Resolve the client identity for throttling.
/// With trust_proxy, the leftmost X-Forwarded-For entry wins; a missing
/// or empty header falls back to the peer address.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }
    }
    peer.ip().to_string()
}

pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response<Body>, StatusCode> {
    let client = client_ip(req.headers(), addr, state.trust_proxy);

    match state.limiter.check(&client).await {
        RateLimitDecision::Allowed { .. } => Ok(next.run(req).await),
        RateLimitDecision::Limited {
            retry_after_seconds,
        } => {
            warn!("Rate limit exceeded for {}", client);

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Too many requests, please try again later",
                    "status": 429,
                    "retryAfter": retry_after_seconds
                })),
            )
                .into_response();

            if let Ok(value) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
                response.headers_mut().insert("retry-after", value);
            }

            Ok(response)
        },
    }
}
