//! Router configuration for the Web API.

use axum::{
    extract::Request,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::WebConfig;

use super::dto::{
    LoginRequest, MailboxResponse, MessageResponse, RegisterRequest, SendMessageRequest,
    UserSummary,
};
use super::error::ApiError;
use super::handlers::{self, AppState};
use super::middleware::{create_cors_layer, security_headers};
use super::proxy::ClientProxy;

/// OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::verify,
        handlers::messages::list_messages,
        handlers::messages::send_message,
        handlers::messages::delete_message,
        handlers::users::search_users,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        SendMessageRequest,
        UserSummary,
        MessageResponse,
        MailboxResponse,
    )),
    tags(
        (name = "auth", description = "Session management"),
        (name = "messages", description = "Inbox and outbox"),
        (name = "users", description = "User search")
    )
)]
pub struct ApiDoc;

/// Create the main router.
///
/// Resource routes are mounted under `config.resources_route` and session
/// routes under `config.authentication_route`. Anything else goes to the
/// web client when a proxy is given, or gets a 404.
pub fn create_router(
    app_state: Arc<AppState>,
    config: &WebConfig,
    proxy: Option<ClientProxy>,
) -> Router {
    let resources = config.resources_route.as_str();
    let auth = config.authentication_route.as_str();

    let router = Router::new()
        .route(auth, get(handlers::verify))
        .route(&format!("{auth}/register"), post(handlers::register))
        .route(&format!("{auth}/login"), post(handlers::login))
        .route(&format!("{auth}/logout"), post(handlers::logout))
        .route(
            &format!("{resources}/messages"),
            get(handlers::list_messages).post(handlers::send_message),
        )
        .route(
            &format!("{resources}/messages/:id"),
            delete(handlers::delete_message),
        )
        .route(&format!("{resources}/users"), get(handlers::search_users))
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json));

    let router = match proxy {
        Some(proxy) => {
            let proxy = Arc::new(proxy);
            router.fallback(move |req: Request| {
                let proxy = proxy.clone();
                async move { proxy.forward(req).await }
            })
        }
        None => router.fallback(not_found),
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
