//! File download handler.

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Build a Content-Disposition header value for an attachment.
///
/// ASCII names are sent as a plain quoted `filename`. Anything else gets a
/// sanitized fallback plus an RFC 5987 `filename*` parameter.
pub(crate) fn content_disposition_header(filename: &str) -> String {
    let needs_escape = |c: char| c.is_control() || c == '"' || c == '\\';

    if filename.is_ascii() && !filename.chars().any(needs_escape) {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

/// GET /api/download/{filepath} - Stream a file as an attachment.
#[utoipa::path(
    get,
    path = "/api/download/{filepath}",
    tag = "download",
    params(
        ("filepath" = String, Path, description = "File path relative to the served root")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found")
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filepath): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let browser = state.browser.clone();
    let subpath = filepath.clone();
    let path = tokio::task::spawn_blocking(move || browser.resolve_file(&subpath)).await??;

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        tracing::warn!("Failed to open {}: {}", path.display(), e);
        ApiError::not_found("Not found")
    })?;
    let length = file
        .metadata()
        .await
        .map_err(|e| {
            tracing::error!("Failed to stat {}: {}", path.display(), e);
            ApiError::internal("Failed to read file")
        })?
        .len();

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();

    tracing::info!(path = %filepath, size = length, "Serving download");

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&filename),
        )
        .header(header::CONTENT_LENGTH, length)
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}
