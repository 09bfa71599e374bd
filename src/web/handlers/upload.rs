//! File upload handlers.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;

use crate::file::PendingUpload;
use crate::web::dto::{ApiResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::FileBrowserError;

/// Multipart field carrying the file.
pub const UPLOAD_FIELD: &str = "file";

/// Bytes buffered from the request before each disk write.
const WRITE_BATCH: usize = 1024 * 1024;

/// POST /api/upload - Upload a file into the served root.
///
/// Expects a multipart body with a `file` field.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file provided"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_root(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    receive_upload(state, String::new(), multipart).await
}

/// POST /api/upload/{subpath} - Upload a file into a folder, creating it if needed.
#[utoipa::path(
    post,
    path = "/api/upload/{subpath}",
    tag = "upload",
    params(
        ("subpath" = String, Path, description = "Destination folder relative to the served root")
    ),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file provided"),
        (status = 404, description = "Destination outside the served root"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_to_folder(
    State(state): State<Arc<AppState>>,
    Path(subpath): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    receive_upload(state, subpath, multipart).await
}

/// Stream the first `file` field to disk; other fields are skipped.
async fn receive_upload(
    state: Arc<AppState>,
    subpath: String,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(ApiError::from_multipart)?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::bad_request("No file provided"));
        }

        let browser = state.browser.clone();
        let folder = subpath.clone();
        let mut pending =
            tokio::task::spawn_blocking(move || browser.begin_upload(&folder, &filename)).await??;

        let mut batch = Vec::with_capacity(WRITE_BATCH);
        while let Some(chunk) = field.chunk().await.map_err(ApiError::from_multipart)? {
            batch.extend_from_slice(&chunk);
            if batch.len() >= WRITE_BATCH {
                pending = write_batch(pending, std::mem::take(&mut batch)).await?;
            }
        }
        if !batch.is_empty() {
            pending = write_batch(pending, batch).await?;
        }

        let browser = state.browser.clone();
        let uploaded =
            tokio::task::spawn_blocking(move || browser.finish_upload(pending)).await??;

        return Ok(Json(ApiResponse::new(UploadResponse::from(uploaded))));
    }

    Err(ApiError::bad_request("No file provided"))
}

/// Append buffered bytes to the upload off the async workers.
async fn write_batch(
    mut pending: PendingUpload,
    batch: Vec<u8>,
) -> Result<PendingUpload, ApiError> {
    let pending = tokio::task::spawn_blocking(move || {
        pending.write_chunk(&batch)?;
        Ok::<_, FileBrowserError>(pending)
    })
    .await??;
    Ok(pending)
}
