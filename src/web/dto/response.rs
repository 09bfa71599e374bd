//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::file::{human_readable_size, DirectoryEntry, Listing, UploadedFile};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Folder listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    /// Folder subpath ("" for the root).
    pub path: String,
    /// Entries on the requested page.
    pub entries: Vec<DirectoryEntry>,
    /// Requested page number.
    pub page: i64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Sort key as requested.
    pub sort_by: String,
    /// Effective sort direction.
    pub order: String,
    /// Direction a client should request to flip the current order.
    pub next_order: String,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            path: listing.path,
            entries: listing.entries,
            page: listing.page,
            total_pages: listing.total_pages,
            sort_by: listing.sort_by,
            order: listing.order.to_string(),
            next_order: listing.order.toggled().to_string(),
        }
    }
}

/// Upload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Stored file name (may carry a `_N` suffix).
    pub name: String,
    /// Subpath of the stored file.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Size rendered for display.
    pub size_display: String,
}

impl From<UploadedFile> for UploadResponse {
    fn from(file: UploadedFile) -> Self {
        Self {
            size_display: human_readable_size(file.size),
            name: file.name,
            path: file.relative_path,
            size: file.size,
        }
    }
}
