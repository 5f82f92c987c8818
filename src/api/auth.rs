//! Authentication middleware for the REST API
//!
//! Sensitive routes require an `X-API-Key` header exactly matching the
//! configured shared secret. Anything else gets a 401 before the handler
//! (and any background work) runs.

use crate::error::ApiError;
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Header carrying the shared secret (matched case-insensitively)
pub const API_KEY_HEADER: &str = "x-api-key";

const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing API key";

/// Middleware checking the `X-API-Key` header against the shared secret
///
/// # Examples
///
/// ```no_run
/// use axum::{Router, middleware, routing::get};
/// use audio_dl::api::auth::require_api_key;
/// use std::sync::Arc;
///
/// let secret: Arc<str> = Arc::from("secret-key-123");
/// let router: Router = Router::new()
///     .route("/private", get(|| async { "ok" }))
///     .route_layer(middleware::from_fn_with_state(secret, require_api_key));
/// ```
pub async fn require_api_key(
    State(expected_key): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    // Uses constant-time comparison to prevent timing side-channel attacks
    match provided {
        Some(key) if constant_time_eq(key.as_bytes(), expected_key.as_bytes()) => {
            next.run(request).await
        }
        _ => {
            tracing::debug!(
                path = %request.uri().path(),
                header_present = provided.is_some(),
                "Rejected request with bad API key"
            );
            unauthorized_response()
        }
    }
}

/// Constant-time byte comparison to prevent timing side-channel attacks.
/// Always compares all bytes regardless of where the first mismatch occurs.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiError::unauthorized(UNAUTHORIZED_MESSAGE)),
    )
        .into_response()
}
