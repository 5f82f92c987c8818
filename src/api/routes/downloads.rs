//! Download trigger handler.

use crate::api::AppState;
use crate::error::{Error, Result};
use crate::extractor::{ExtractOptions, download_audio};
use crate::types::{DownloadRequest, DownloadResponse};
use axum::{Json, body::Bytes, extract::State};
use std::sync::Arc;

/// POST /download - Download a URL or the first search hit as audio
///
/// Validation happens before anything is queued. The handler then waits for
/// the pool job to finish; there is no asynchronous job API.
///
/// The body is parsed as JSON whatever the `Content-Type` header says.
#[utoipa::path(
    post,
    path = "/download",
    tag = "downloads",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Audio downloaded", body = DownloadResponse),
        (status = 400, description = "Malformed body, neither 'url' nor 'query' given, or unsupported audio format", body = crate::error::ApiError),
        (status = 401, description = "Invalid or missing API key", body = crate::error::ApiError),
        (status = 500, description = "Extraction failed", body = crate::error::ApiError),
        (status = 503, description = "yt-dlp could not be executed", body = crate::error::ApiError)
    ),
    security(("api_key" = []))
)]
pub async fn start_download(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DownloadResponse>> {
    let request = parse_request(&body)?;
    let target = request.target()?;
    let audio_format = request.effective_format(state.settings.audio_format)?;

    let options = ExtractOptions {
        download_dir: state.settings.download_dir.clone(),
        audio_format,
        audio_quality: state.settings.audio_quality.clone(),
        output_template: state.settings.output_template.clone(),
    };

    tracing::info!(source = %target, format = %audio_format, "Queueing download");

    let extractor = Arc::clone(&state.extractor);
    let handle = state
        .pool
        .submit(move || download_audio(extractor.as_ref(), &target, &options))?;
    let result = handle.wait().await?;

    Ok(Json(DownloadResponse::new(result, audio_format)))
}

fn parse_request(body: &[u8]) -> Result<DownloadRequest> {
    serde_json::from_slice(body).map_err(|e| Error::Validation(format!("Invalid request body: {e}")))
}
