//! Test helpers for Web API tests.
//!
//! Builds a served tree in a temporary directory and wraps the API router
//! in an axum-test server.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use dirserve::config::WebConfig;
use dirserve::datetime::DisplayZone;
use dirserve::web::handlers::AppState;
use dirserve::web::router::create_router;
use dirserve::{FileBrowser, ServedRoot};
use tempfile::TempDir;

/// A served tree and the API server exposing it.
///
/// The served root is `<temp>/served`; `<temp>/secret.txt` sits just
/// outside it.
pub struct TestTree {
    pub temp_dir: TempDir,
    pub server: TestServer,
}

impl TestTree {
    /// Path of the served root.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("served")
    }

    /// Path beneath the served root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }
}

/// Create a test configuration.
pub fn create_test_config() -> WebConfig {
    WebConfig {
        cors_origins: vec![],
        serve_static: false,
        static_path: "web/dist".to_string(),
        api_rate_limit: 0,
        trust_proxy_headers: false,
    }
}

/// Populate a fresh temporary tree.
///
/// ```text
/// served/
///   a.txt        (2048 bytes)
///   b.txt        (100 bytes)
///   notes.md
///   z/
///     inner.txt
/// secret.txt
/// ```
pub fn create_tree() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let served = temp_dir.path().join("served");
    fs::create_dir_all(served.join("z")).unwrap();
    fs::write(served.join("a.txt"), vec![b'a'; 2048]).unwrap();
    fs::write(served.join("b.txt"), vec![b'b'; 100]).unwrap();
    fs::write(served.join("notes.md"), "# notes\n").unwrap();
    fs::write(served.join("z/inner.txt"), "inside").unwrap();
    fs::write(temp_dir.path().join("secret.txt"), "top secret").unwrap();
    temp_dir
}

/// Create a test server over [`create_tree`].
pub fn create_test_server() -> TestTree {
    create_test_server_with(|browser| browser, create_test_config())
}

/// Create a test server, customizing the browser and web configuration.
pub fn create_test_server_with(
    customize: impl FnOnce(FileBrowser) -> FileBrowser,
    config: WebConfig,
) -> TestTree {
    let temp_dir = create_tree();
    let root = ServedRoot::new(temp_dir.path().join("served")).expect("Failed to open root");
    let browser = customize(FileBrowser::new(root).with_zone(DisplayZone::from_config("UTC")));

    let app_state = Arc::new(AppState::new(browser));
    let router = create_router(app_state, &config);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestTree { temp_dir, server }
}
