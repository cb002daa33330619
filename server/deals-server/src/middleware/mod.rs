//! Middleware for request processing

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::debug;

/// Time each request and stamp the elapsed milliseconds on the
/// response as `x-response-time-ms`.
pub async fn request_timing_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_millis();
    debug!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = %elapsed_ms,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&elapsed_ms.to_string()) {
        response.headers_mut().insert("x-response-time-ms", value);
    }

    response
}
