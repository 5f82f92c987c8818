//! File retrieval handler.

use super::FileQuery;
use crate::error::{Error, Result};
use axum::{
    body::Body,
    extract::{Query, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use tokio_util::io::ReaderStream;

/// GET /file - Stream a file by absolute path
#[utoipa::path(
    get,
    path = "/file",
    tag = "files",
    params(FileQuery),
    responses(
        (status = 200, description = "Raw file bytes with a guessed content type"),
        (status = 400, description = "Missing or malformed 'path' parameter", body = crate::error::ApiError),
        (status = 401, description = "Invalid or missing API key", body = crate::error::ApiError),
        (status = 404, description = "File not found", body = crate::error::ApiError)
    ),
    security(("api_key" = []))
)]
pub async fn get_file(
    query: std::result::Result<Query<FileQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query.map_err(|rejection| Error::Validation(rejection.body_text()))?;
    let path = PathBuf::from(&query.path);

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => return Err(Error::NotFound("File not found".into())),
    };

    let file = tokio::fs::File::open(&path).await?;
    let content_type = mime_guess::from_path(&path).first_or_octet_stream();

    tracing::debug!(path = %path.display(), size = metadata.len(), "Serving file");

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
