//! Web API module for dirserve.
//!
//! Exposes the served tree over HTTP: JSON folder listings, streamed
//! downloads and multipart uploads, plus an OpenAPI document.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{create_router, ApiDoc};
pub use server::WebServer;
