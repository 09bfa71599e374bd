//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for folder listings.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// Sort key: name, size, creation_time, modification_time or type.
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// Sort direction: asc or desc.
    #[serde(default = "default_order")]
    pub order: String,
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_sort_by() -> String {
    "name".to_string()
}

fn default_order() -> String {
    "asc".to_string()
}

fn default_page() -> i64 {
    1
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            sort_by: default_sort_by(),
            order: default_order(),
            page: default_page(),
        }
    }
}
