//! Session authentication extractors.
//!
//! The session token is read from the session cookie, or from an
//! `Authorization: Bearer` header for non-browser clients, and resolved to
//! a [`User`] on every request.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::db::{User, UserRepository};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Extract the raw session token from a request.
fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(cookie_name) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// The caller's user, if the request carries a valid session.
///
/// Never rejects for a missing, forged or expired session; only store
/// failures surface as errors.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts, &state.session_cookie) else {
            return Ok(CurrentUser(None));
        };

        let claims = match state.sessions.verify(&token) {
            Ok(claims) => claims,
            Err(_) => return Ok(CurrentUser(None)),
        };

        let user = UserRepository::new(state.db.pool())
            .get_by_id(claims.sub)
            .await?;

        if user.is_none() {
            tracing::debug!(user_id = claims.sub, "Session names an unknown user");
        }

        Ok(CurrentUser(user))
    }
}

/// Extractor for authenticated users.
///
/// Rejects with 401 when the request has no valid session.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        user.map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
