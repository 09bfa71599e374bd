//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::WebConfig;

use super::dto::{ListingResponse, UploadResponse};
use super::handlers::{self, AppState};
use super::middleware::{api_rate_limit, create_cors_layer, security_headers, RateLimitState};

/// Bytes allowed on top of the upload limit for multipart framing.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// OpenAPI document for the file browser API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::browse_root,
        handlers::browse_folder,
        handlers::download_file,
        handlers::upload_root,
        handlers::upload_to_folder,
    ),
    components(schemas(ListingResponse, UploadResponse, crate::file::DirectoryEntry)),
    tags(
        (name = "browse", description = "Folder listings"),
        (name = "download", description = "File downloads"),
        (name = "upload", description = "File uploads")
    )
)]
pub struct ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, web_config: &WebConfig) -> Router {
    let body_limit = app_state
        .browser
        .max_upload_size()
        .saturating_add(MULTIPART_OVERHEAD)
        .try_into()
        .unwrap_or(usize::MAX);

    let mut api_routes = Router::new()
        .route("/browse", get(handlers::browse_root))
        .route("/browse/", get(handlers::browse_root))
        .route("/browse/*subpath", get(handlers::browse_folder))
        .route("/download/*filepath", get(handlers::download_file))
        .route("/upload", post(handlers::upload_root))
        .route("/upload/", post(handlers::upload_root))
        .route("/upload/*subpath", post(handlers::upload_to_folder))
        .layer(DefaultBodyLimit::max(body_limit));

    let rate_limit = RateLimitState::new(web_config.api_rate_limit, web_config.trust_proxy_headers);
    if let Some(limiter) = rate_limit {
        limiter.clone().start_cleanup_task();
        api_routes = api_routes.layer(middleware::from_fn(move |req, next| {
            api_rate_limit(limiter.clone(), req, next)
        }));
    }

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&web_config.cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create a router serving a static front-end, if its folder exists.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    if !Path::new(static_path).is_dir() {
        tracing::warn!("Static path {} does not exist, not serving front-end", static_path);
        return None;
    }

    tracing::info!("Serving static front-end from {}", static_path);
    Some(Router::new().fallback_service(
        ServeDir::new(static_path).append_index_html_on_directories(true),
    ))
}
