// Baseline security headers on every response.

use axum::{
    body::Body,
    http::{header::HeaderValue, Request, Response, StatusCode},
    middleware::Next,
};

pub async fn security_headers_middleware(
    req: Request<Body>,
    next: Next,
) -> Result<Response<Body>, StatusCode> {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        "x-dns-prefetch-control",
        HeaderValue::from_static("off"),
    );

    Ok(response)
}
