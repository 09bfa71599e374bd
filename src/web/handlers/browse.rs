//! Folder listing handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::file::ListingRequest;
use crate::web::dto::{ApiResponse, ListingQuery, ListingResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/browse - List the served root.
#[utoipa::path(
    get,
    path = "/api/browse",
    tag = "browse",
    params(ListingQuery),
    responses(
        (status = 200, description = "One page of the root folder", body = ListingResponse),
        (status = 400, description = "Malformed query parameters")
    )
)]
pub async fn browse_root(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ApiResponse<ListingResponse>>, ApiError> {
    list_folder(state, String::new(), query).await
}

/// GET /api/browse/{subpath} - List a folder beneath the served root.
#[utoipa::path(
    get,
    path = "/api/browse/{subpath}",
    tag = "browse",
    params(
        ("subpath" = String, Path, description = "Folder path relative to the served root"),
        ListingQuery
    ),
    responses(
        (status = 200, description = "One page of the folder", body = ListingResponse),
        (status = 400, description = "Malformed query parameters"),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn browse_folder(
    State(state): State<Arc<AppState>>,
    Path(subpath): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ApiResponse<ListingResponse>>, ApiError> {
    list_folder(state, subpath, query).await
}

async fn list_folder(
    state: Arc<AppState>,
    subpath: String,
    query: ListingQuery,
) -> Result<Json<ApiResponse<ListingResponse>>, ApiError> {
    let request = ListingRequest::new(subpath)
        .with_sort(query.sort_by, query.order)
        .with_page(query.page);

    // Directory enumeration stats every entry; keep it off the reactor.
    let browser = state.browser.clone();
    let listing = tokio::task::spawn_blocking(move || browser.list(&request)).await??;

    Ok(Json(ApiResponse::new(ListingResponse::from(listing))))
}
