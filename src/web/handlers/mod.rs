//! Request handlers for Web API.

pub mod browse;
pub mod download;
pub mod upload;

use std::sync::Arc;

use crate::file::FileBrowser;

pub use browse::*;
pub use download::*;
pub use upload::*;

/// Application state shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// File browsing service for the served root.
    pub browser: Arc<FileBrowser>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(browser: FileBrowser) -> Self {
        Self {
            browser: Arc::new(browser),
        }
    }
}
