//! Web API Browse Tests
//!
//! Integration tests for folder listing endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::Value;
use std::fs;

use common::{create_test_config, create_test_server, create_test_server_with};

fn entry_names(body: &Value) -> Vec<String> {
    body["data"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_browse_root_default_order() {
    let tree = create_test_server();

    let response = tree.server.get("/api/browse").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["path"], "");
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["total_pages"], 1);
    assert_eq!(body["data"]["sort_by"], "name");
    assert_eq!(body["data"]["order"], "asc");
    assert_eq!(body["data"]["next_order"], "desc");
    assert_eq!(entry_names(&body), ["a.txt", "b.txt", "notes.md", "z"]);
}

#[tokio::test]
async fn test_browse_root_with_trailing_slash() {
    let tree = create_test_server();

    let response = tree.server.get("/api/browse/").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["path"], "");
    assert_eq!(entry_names(&body), ["a.txt", "b.txt", "notes.md", "z"]);
}

#[tokio::test]
async fn test_browse_entry_fields() {
    let tree = create_test_server();

    let body: Value = tree.server.get("/api/browse").await.json();
    let entries = body["data"]["entries"].as_array().unwrap();

    let a = &entries[0];
    assert_eq!(a["name"], "a.txt");
    assert_eq!(a["size_bytes"], 2048);
    assert_eq!(a["size_display"], "2.00 KB");
    assert_eq!(a["kind"], ".txt");
    assert_eq!(a["modified_at"].as_str().unwrap().len(), 19);
    assert_eq!(a["created_at"].as_str().unwrap().len(), 19);

    let z = &entries[3];
    assert_eq!(z["name"], "z");
    assert_eq!(z["kind"], "Directory");
    assert_eq!(z["size_bytes"], 0);
}

#[tokio::test]
async fn test_browse_sort_by_size_desc() {
    let tree = create_test_server();

    let body: Value = tree
        .server
        .get("/api/browse")
        .add_query_param("sort_by", "size")
        .add_query_param("order", "desc")
        .await
        .json();

    let names = entry_names(&body);
    assert_eq!(names[0], "a.txt");
    assert_eq!(names[1], "b.txt");
    assert_eq!(body["data"]["order"], "desc");
    assert_eq!(body["data"]["next_order"], "asc");
}

#[tokio::test]
async fn test_browse_sort_by_type_groups_directories_first() {
    let tree = create_test_server();

    let body: Value = tree
        .server
        .get("/api/browse")
        .add_query_param("sort_by", "type")
        .await
        .json();

    // "." sorts before "D", so extensions come ahead of "Directory".
    assert_eq!(entry_names(&body), ["notes.md", "a.txt", "b.txt", "z"]);
}

#[tokio::test]
async fn test_browse_unknown_sort_key_keeps_name_order() {
    let tree = create_test_server();

    let body: Value = tree
        .server
        .get("/api/browse")
        .add_query_param("sort_by", "colour")
        .add_query_param("order", "desc")
        .await
        .json();

    assert_eq!(body["data"]["sort_by"], "colour");
    assert_eq!(entry_names(&body), ["a.txt", "b.txt", "notes.md", "z"]);
}

#[tokio::test]
async fn test_browse_unrecognized_order_is_ascending() {
    let tree = create_test_server();

    let body: Value = tree
        .server
        .get("/api/browse")
        .add_query_param("order", "sideways")
        .await
        .json();

    assert_eq!(body["data"]["order"], "asc");
}

#[tokio::test]
async fn test_browse_subfolder() {
    let tree = create_test_server();

    let response = tree.server.get("/api/browse/z").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["path"], "z");
    assert_eq!(entry_names(&body), ["inner.txt"]);
}

#[tokio::test]
async fn test_browse_missing_folder() {
    let tree = create_test_server();

    let response = tree.server.get("/api/browse/nowhere").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_browse_file_is_not_a_folder() {
    let tree = create_test_server();

    let response = tree.server.get("/api/browse/a.txt").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_browse_traversal_looks_like_missing_folder() {
    let tree = create_test_server();

    let escape = tree.server.get("/api/browse/..%2F..%2Ftmp").await;
    let missing = tree.server.get("/api/browse/nowhere").await;

    escape.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(escape.text(), missing.text());
}

#[tokio::test]
async fn test_browse_pagination() {
    let tree = create_test_server_with(|browser| browser.with_page_size(3), create_test_config());

    let first: Value = tree.server.get("/api/browse").await.json();
    assert_eq!(first["data"]["total_pages"], 2);
    assert_eq!(entry_names(&first), ["a.txt", "b.txt", "notes.md"]);

    let second: Value = tree
        .server
        .get("/api/browse")
        .add_query_param("page", 2)
        .await
        .json();
    assert_eq!(second["data"]["page"], 2);
    assert_eq!(entry_names(&second), ["z"]);

    let beyond: Value = tree
        .server
        .get("/api/browse")
        .add_query_param("page", 9)
        .await
        .json();
    assert_eq!(beyond["data"]["total_pages"], 2);
    assert!(entry_names(&beyond).is_empty());

    let zero: Value = tree
        .server
        .get("/api/browse")
        .add_query_param("page", 0)
        .await
        .json();
    assert!(entry_names(&zero).is_empty());
}

#[tokio::test]
async fn test_browse_non_numeric_page_is_rejected() {
    let tree = create_test_server();

    let response = tree
        .server
        .get("/api/browse")
        .add_query_param("page", "two")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_browse_empty_folder() {
    let tree = create_test_server();
    fs::create_dir(tree.path("empty")).unwrap();

    let body: Value = tree.server.get("/api/browse/empty").await.json();
    assert_eq!(body["data"]["total_pages"], 0);
    assert!(entry_names(&body).is_empty());
}

#[tokio::test]
async fn test_browse_sets_no_store() {
    let tree = create_test_server();

    let response = tree.server.get("/api/browse").await;
    assert_eq!(response.header("Cache-Control"), "no-store, max-age=0");
    assert_eq!(response.header("X-Content-Type-Options"), "nosniff");
}

#[tokio::test]
async fn test_browse_rate_limited() {
    let mut config = create_test_config();
    config.api_rate_limit = 2;
    let tree = create_test_server_with(|browser| browser, config);

    tree.server.get("/api/browse").await.assert_status_ok();
    tree.server.get("/api/browse").await.assert_status_ok();

    let response = tree.server.get("/api/browse").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "TOO_MANY_REQUESTS");
}

#[tokio::test]
async fn test_browse_rate_limit_ignores_spoofed_forwarded_for() {
    let mut config = create_test_config();
    config.api_rate_limit = 2;
    let tree = create_test_server_with(|browser| browser, config);

    for ip in ["198.51.100.1", "198.51.100.2"] {
        tree.server
            .get("/api/browse")
            .add_header("X-Forwarded-For", ip)
            .await
            .assert_status_ok();
    }

    tree.server
        .get("/api/browse")
        .add_header("X-Forwarded-For", "198.51.100.3")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_browse_rate_limit_per_forwarded_client_when_trusted() {
    let mut config = create_test_config();
    config.api_rate_limit = 1;
    config.trust_proxy_headers = true;
    let tree = create_test_server_with(|browser| browser, config);

    let get_as = |ip: &'static str| {
        tree.server
            .get("/api/browse")
            .add_header("X-Forwarded-For", ip)
    };

    get_as("198.51.100.1").await.assert_status_ok();
    get_as("198.51.100.2").await.assert_status_ok();
    get_as("198.51.100.1")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}
