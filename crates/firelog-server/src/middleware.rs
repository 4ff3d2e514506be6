use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::ApiError;
use crate::AppState;

/// Middleware bounding each request by `AppState::request_timeout`.
///
/// An expired request is answered with 503 and the `timeout` error code.
/// Blocking database work already handed to the pool thread runs to
/// completion in the background; only the response is abandoned.
pub async fn request_timeout_middleware(
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let timeout = req
        .extensions()
        .get::<Arc<AppState>>()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
        .request_timeout;

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match tokio::time::timeout(timeout, next.run(req)).await {
        Ok(response) => Ok(response),
        Err(_) => {
            tracing::warn!(
                method = %method,
                path = %path,
                timeout_ms = timeout.as_millis() as u64,
                "request timed out"
            );
            Ok(ApiError::Timeout.into_response())
        }
    }
}
