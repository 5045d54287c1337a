//! Web Client Proxy Tests
//!
//! Requests that match no API route are forwarded to the web client.

mod common;

use axum::body::Bytes;
use axum::http::{
    header::SET_COOKIE, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri,
};
use axum::response::IntoResponse;
use axum::{Json, Router};
use common::{create_test_config, create_test_server_with, register_user};
use mailroom::web::ClientProxy;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let mut response_headers = HeaderMap::new();
    response_headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark; Path=/"));
    response_headers.append(SET_COOKIE, HeaderValue::from_static("lang=en; Path=/"));

    let marker = headers
        .get("x-client-test")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    (
        StatusCode::IM_A_TEAPOT,
        response_headers,
        Json(json!({
            "method": method.as_str(),
            "path": uri.path(),
            "query": uri.query(),
            "marker": marker,
            "body": String::from_utf8_lossy(&body),
        })),
    )
}

async fn spawn_client() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(echo);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn test_unmatched_paths_are_forwarded() {
    let addr = spawn_client().await;
    let proxy = ClientProxy::new(&format!("http://{addr}/")).unwrap();
    let (server, _db) = create_test_server_with(create_test_config(), Some(proxy)).await;

    let response = server
        .post("/compose/draft")
        .add_query_param("to", "bob")
        .add_header(
            HeaderName::from_static("x-client-test"),
            HeaderValue::from_static("forwarded"),
        )
        .text("hello client")
        .await;

    response.assert_status(StatusCode::IM_A_TEAPOT);
    let body = response.json::<Value>();
    assert_eq!(body["method"], "POST");
    assert_eq!(body["path"], "/compose/draft");
    assert_eq!(body["query"], "to=bob");
    assert_eq!(body["marker"], "forwarded");
    assert_eq!(body["body"], "hello client");

    let cookies: Vec<_> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies, vec!["theme=dark; Path=/", "lang=en; Path=/"]);
}

#[tokio::test]
async fn test_absolute_url_in_path_stays_on_client() {
    let client = spawn_client().await;
    let other = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(|| async { "other host" });
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    };
    let proxy = ClientProxy::new(&format!("http://{client}/")).unwrap();
    let (server, _db) = create_test_server_with(create_test_config(), Some(proxy)).await;

    let response = server.get(&format!("/http://{other}/secret")).await;

    response.assert_status(StatusCode::IM_A_TEAPOT);
    assert_ne!(response.text(), "other host");
    let path = response.json::<Value>()["path"].as_str().unwrap().to_string();
    assert!(path.starts_with("/http:"), "{path}");
    assert!(path.ends_with("/secret"), "{path}");
}

#[tokio::test]
async fn test_api_routes_are_not_forwarded() {
    let addr = spawn_client().await;
    let proxy = ClientProxy::new(&format!("http://{addr}")).unwrap();
    let (server, _db) = create_test_server_with(create_test_config(), Some(proxy)).await;

    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.text(), "OK");

    register_user(&server, "alice", "secret1").await;
    let users = server.get("/api/users").add_query_param("q", "al").await;
    users.assert_status_ok();
    assert_eq!(users.json::<Value>()[0]["username"], "alice");
}

#[tokio::test]
async fn test_unreachable_client() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let proxy = ClientProxy::new(&format!("http://{addr}/")).unwrap();
    let (server, _db) = create_test_server_with(create_test_config(), Some(proxy)).await;

    let response = server.get("/index.html").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>()["error"]["code"], "BAD_GATEWAY");
}
