//! Message handlers for the Web API.

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::mail::{ListingKind, MailService, SendMessage};
use crate::web::dto::{
    DeleteMessageQuery, MailboxResponse, MessageResponse, SendMessageRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{AuthUser, CurrentUser};

/// GET {resources}/messages - The caller's inbox and outbox.
///
/// Unauthenticated callers get 404 rather than 401.
#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messages",
    responses(
        (status = 200, description = "Inbox and outbox, newest first", body = MailboxResponse),
        (status = 404, description = "Not logged in")
    )
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MailboxResponse>, ApiError> {
    let user = user.ok_or_else(|| ApiError::not_found("Not found"))?;

    let mailbox = MailService::new(&state.db).mailbox(user.id).await?;
    Ok(Json(mailbox.into()))
}

/// POST {resources}/messages - Send a message.
///
/// The sender is always the logged-in user. Without a session the request's
/// `sender_id` is used only if the server allows unauthenticated senders.
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Missing subject, message, sender or receiver"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let sender_id = match user {
        Some(user) => Some(user.id),
        None if state.allow_unauthenticated_sender => req.sender_id,
        None => return Err(ApiError::unauthorized("Authentication required")),
    };

    let request = SendMessage {
        subject: req.subject.unwrap_or_default(),
        body: req.message.unwrap_or_default(),
        sender_id,
        receiver_id: req.receiver_id,
    };

    let message = MailService::new(&state.db).send(&request).await?;
    Ok(Json(message.into()))
}

/// DELETE {resources}/messages/:id - Remove a message from one of the
/// caller's mailboxes.
#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    tag = "messages",
    params(
        ("id" = i64, Path, description = "Message ID"),
        DeleteMessageQuery
    ),
    responses(
        (status = 204, description = "Listing removed"),
        (status = 400, description = "Missing or unknown listing type"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such listing in the caller's mailbox")
    )
)]
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    Query(query): Query<DeleteMessageQuery>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        ApiError::bad_request(format!("Invalid message id: {}", rejection.body_text()))
    })?;
    let kind: ListingKind = match query.listing_type.as_deref() {
        None | Some("") => {
            return Err(ApiError::bad_request(
                "The message listing type must be specified",
            ))
        }
        Some(value) => value.parse()?,
    };

    MailService::new(&state.db)
        .remove_listing(user.id, id, kind)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
