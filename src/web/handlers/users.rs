//! User search handler.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::db::UserRepository;
use crate::web::dto::{UserSearchQuery, UserSummary};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET {resources}/users?q= - Find users whose name contains `q`.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching users, by username", body = Vec<UserSummary>),
        (status = 400, description = "Missing search parameter")
    )
)]
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserSearchQuery>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let q = query
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("A search parameter must be specified"))?;

    let users = UserRepository::new(state.db.pool()).search(&q).await?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}
