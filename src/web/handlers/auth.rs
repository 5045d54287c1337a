//! Session handlers: register, login, logout and session check.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use tracing::info;

use crate::auth::{self, RegistrationRequest, SessionKeys};
use crate::config::WebConfig;
use crate::db::{User, UserRepository};
use crate::web::dto::{LoginRequest, RegisterRequest, UserSummary, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, CurrentUser};
use crate::{Database, MailroomError};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Arc<Database>,
    /// Session token keys.
    pub sessions: SessionKeys,
    /// Name of the session cookie.
    pub session_cookie: String,
    /// Whether unauthenticated callers may name the sender of a message.
    pub allow_unauthenticated_sender: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, config: &WebConfig) -> Self {
        Self {
            db,
            sessions: SessionKeys::new(&config.session_secret, config.session_expiry_secs),
            session_cookie: config.session_cookie.clone(),
            allow_unauthenticated_sender: config.allow_unauthenticated_sender,
        }
    }

    /// Issue a session for `user` and add its cookie to the jar.
    fn start_session(&self, jar: CookieJar, user: &User) -> Result<CookieJar, ApiError> {
        let token = self
            .sessions
            .issue(user)
            .map_err(|e| ApiError::from(MailroomError::from(e)))?;

        let cookie = Cookie::build((self.session_cookie.clone(), token))
            .http_only(true)
            .path("/")
            .same_site(SameSite::Lax)
            .build();

        Ok(jar.add(cookie))
    }

    fn end_session(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build((self.session_cookie.clone(), "")).path("/"))
    }
}

/// POST {auth}/register - Create an account and log in.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 204, description = "Registered and logged in"),
        (status = 400, description = "Username or password too short"),
        (status = 403, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = auth::register(&repo, RegistrationRequest::new(req.username, req.password)).await?;

    let jar = state.start_session(jar, &user)?;
    Ok((jar, StatusCode::NO_CONTENT))
}

/// POST {auth}/login - Log in.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 204, description = "Logged in, session cookie set"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = auth::authenticate(&repo, &req.username, &req.password).await?;

    info!(user_id = user.id, username = %user.username, "User logged in");

    let jar = state.start_session(jar, &user)?;
    Ok((jar, StatusCode::NO_CONTENT))
}

/// POST {auth}/logout - Log out.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Logged out, session cookie cleared"),
        (status = 400, description = "Not logged in")
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let user = user.ok_or_else(|| ApiError::bad_request("Not logged in"))?;

    info!(user_id = user.id, "User logged out");

    Ok((state.end_session(jar), StatusCode::NO_CONTENT))
}

/// GET {auth} - The logged-in user.
#[utoipa::path(
    get,
    path = "/auth",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserSummary),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn verify(AuthUser(user): AuthUser) -> Json<UserSummary> {
    Json(UserSummary::from(user))
}
