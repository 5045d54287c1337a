//! Shared helpers for the Web API integration tests.

#![allow(dead_code)]

use axum::http::{header::COOKIE, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use mailroom::config::WebConfig;
use mailroom::web::{create_router, AppState, ClientProxy};
use mailroom::Database;
use serde_json::{json, Value};
use std::sync::Arc;

/// Name of the session cookie in the test configuration.
pub const SESSION_COOKIE: &str = "mailroom_session";

/// Create a test configuration.
pub fn create_test_config() -> WebConfig {
    WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        session_secret: "test-secret-key-for-testing-only".to_string(),
        ..WebConfig::default()
    }
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Arc<Database>) {
    create_test_server_with(create_test_config(), None).await
}

/// Create a test server with the given configuration and optional proxy.
pub async fn create_test_server_with(
    config: WebConfig,
    proxy: Option<ClientProxy>,
) -> (TestServer, Arc<Database>) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let shared_db = Arc::new(db);

    let app_state = Arc::new(AppState::new(shared_db.clone(), &config));
    let router = create_router(app_state, &config, proxy);

    let server = TestServer::new(router).expect("Failed to create test server");

    (server, shared_db)
}

/// A logged-in test user.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub username: String,
    pub token: String,
}

impl Session {
    /// Attach this session's cookie to a request.
    pub fn apply(&self, request: TestRequest) -> TestRequest {
        let value = HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", self.token))
            .expect("valid cookie header");
        request.add_header(COOKIE, value)
    }
}

/// Register a user through the API and return their session.
pub async fn register_user(server: &TestServer, username: &str, password: &str) -> Session {
    let response = server
        .post("/auth/register")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let token = response.cookie(SESSION_COOKIE).value().to_string();
    session_for(server, token).await
}

/// Log a user in through the API and return their session.
pub async fn login_user(server: &TestServer, username: &str, password: &str) -> Session {
    let response = server
        .post("/auth/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let token = response.cookie(SESSION_COOKIE).value().to_string();
    session_for(server, token).await
}

async fn session_for(server: &TestServer, token: String) -> Session {
    let value = HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}"))
        .expect("valid cookie header");
    let me = server.get("/auth").add_header(COOKIE, value).await;
    me.assert_status_ok();

    let body = me.json::<Value>();
    Session {
        id: body["id"].as_i64().expect("user id"),
        username: body["username"].as_str().expect("username").to_string(),
        token,
    }
}

/// Send a message as `session` and return the created message JSON.
pub async fn send_message(
    server: &TestServer,
    session: &Session,
    receiver_id: i64,
    subject: &str,
    message: &str,
) -> Value {
    let response = session
        .apply(server.post("/api/messages"))
        .json(&json!({
            "subject": subject,
            "message": message,
            "receiver_id": receiver_id
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

/// Fetch the mailbox of `session`.
pub async fn mailbox(server: &TestServer, session: &Session) -> Value {
    let response = session.apply(server.get("/api/messages")).await;
    response.assert_status_ok();
    response.json::<Value>()
}

/// IDs of the messages in a mailbox list.
pub fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .expect("message list")
        .iter()
        .map(|m| m["id"].as_i64().expect("message id"))
        .collect()
}
