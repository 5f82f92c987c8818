//! REST API server module
//!
//! HTTP façade over the extraction worker pool: a service descriptor, health
//! check, download trigger, authenticated file retrieval and a static mount
//! of the download directory.

use crate::{Error, Result};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Public
/// - `GET /` - Service descriptor
/// - `GET /health` - Health check
/// - `GET /files/{name}` - Static files from the download directory
/// - `GET /docs` - Swagger UI
/// - `GET /openapi.json` - OpenAPI specification
///
/// ## Require `X-API-Key`
/// - `POST /download` - Download audio from a URL or search query
/// - `GET /file?path=` - Stream a file by absolute path
pub fn create_router(state: AppState) -> Router {
    let api_key: Arc<str> = Arc::from(state.settings.api_key.as_str());
    let download_dir = state.settings.download_dir.clone();

    // route_layer so the key check only runs for matched routes
    let protected = Router::new()
        .route("/download", post(routes::start_download))
        .route("/file", get(routes::get_file))
        .route_layer(middleware::from_fn_with_state(
            api_key,
            auth::require_api_key,
        ));

    let router = Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health_check))
        .merge(protected)
        // The directory may not exist yet; requests 404 until files appear
        .nest_service("/files", ServeDir::new(download_dir))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .with_state(state);

    router
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

/// CORS layer allowing any origin, method and header
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind to the configured address and serve until SIGINT/SIGTERM
pub async fn start_api_server(state: AppState) -> Result<()> {
    let bind_address = state.settings.bind_address();

    tracing::info!(address = %bind_address, "Starting API server");

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(Error::Io)?;

    serve(listener, state, crate::shutdown_signal()).await
}

/// Serve the API on an already-bound listener until `shutdown` resolves
///
/// In-flight requests are allowed to finish after `shutdown` fires.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr().map_err(Error::Io)?;
    let app = create_router(state);

    tracing::info!(address = %address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
