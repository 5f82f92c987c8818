//! # audio-dl
//!
//! HTTP façade over `yt-dlp` that turns a URL or a search query into a local
//! audio file.
//!
//! ## Components
//!
//! - [`config`]: settings from environment variables (and `.env`)
//! - [`extractor`]: the extraction capability and the download adapter
//! - [`pool`]: fixed-size worker pool running blocking downloads
//! - [`api`]: axum routes, API key middleware and OpenAPI document
//!
//! ## Quick Start
//!
//! ```no_run
//! use audio_dl::{AppState, Settings, WorkerPool, YtDlpExtractor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let pool = WorkerPool::new(settings.workers)?;
//!     let extractor = YtDlpExtractor::discover(settings.ytdlp_path.clone());
//!
//!     let state = AppState::new(Arc::new(settings), Arc::new(pool), Arc::new(extractor));
//!     audio_dl::api::start_api_server(state).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration loaded from the environment
pub mod config;
/// Error types
pub mod error;
/// Media extraction and the download adapter
pub mod extractor;
/// Log output setup
pub mod logging;
/// Worker pool for blocking jobs
pub mod pool;
/// Request, result and response types
pub mod types;

// Re-export commonly used types
pub use api::AppState;
pub use config::{LogFormat, Settings};
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use extractor::{ExtractOptions, MediaExtractor, YtDlpExtractor, download_audio};
pub use pool::{JobHandle, WorkerPool};
pub use types::{AudioFormat, DownloadRequest, DownloadResponse, DownloadResult};

/// Resolve when the process is asked to stop.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

/// Resolve when the process is asked to stop (Ctrl+C).
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
