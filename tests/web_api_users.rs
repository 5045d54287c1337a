//! Web API User Search Tests

mod common;

use axum::http::StatusCode;
use common::{create_test_server, register_user};
use serde_json::Value;

fn usernames(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_search_users() {
    let (server, _db) = create_test_server().await;
    let alice = register_user(&server, "alice", "secret1").await;
    register_user(&server, "bob", "secret2").await;

    let response = server.get("/api/users").add_query_param("q", "al").await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(usernames(&body), vec!["alice"]);
    assert_eq!(body[0]["id"], alice.id);
    assert!(body[0].get("password").is_none());
}

#[tokio::test]
async fn test_search_substring_and_order() {
    let (server, _db) = create_test_server().await;
    for name in ["malia", "alice", "bob", "sal"] {
        register_user(&server, name, "secret1").await;
    }

    let response = server.get("/api/users").add_query_param("q", "al").await;
    assert_eq!(
        usernames(&response.json::<Value>()),
        vec!["alice", "malia", "sal"]
    );

    let upper = server.get("/api/users").add_query_param("q", "AL").await;
    assert_eq!(usernames(&upper.json::<Value>()).len(), 3);
}

#[tokio::test]
async fn test_search_wildcards_are_literal() {
    let (server, _db) = create_test_server().await;
    register_user(&server, "alice", "secret1").await;
    register_user(&server, "bob_b", "secret1").await;

    let percent = server.get("/api/users").add_query_param("q", "%").await;
    assert!(usernames(&percent.json::<Value>()).is_empty());

    let underscore = server.get("/api/users").add_query_param("q", "_").await;
    assert_eq!(usernames(&underscore.json::<Value>()), vec!["bob_b"]);
}

#[tokio::test]
async fn test_search_requires_query() {
    let (server, _db) = create_test_server().await;

    let missing = server.get("/api/users").await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        missing.json::<Value>()["error"]["message"],
        "A search parameter must be specified"
    );

    server
        .get("/api/users")
        .add_query_param("q", "")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_no_match() {
    let (server, _db) = create_test_server().await;
    register_user(&server, "alice", "secret1").await;

    let response = server.get("/api/users").add_query_param("q", "zz").await;
    response.assert_status_ok();
    assert!(usernames(&response.json::<Value>()).is_empty());
}
