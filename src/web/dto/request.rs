//! Request DTOs for the Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validation::no_control_chars;

/// Upper bound on accepted password length (matches the `length` attributes below).
pub const MAX_PASSWORD_INPUT: usize = 1024;

/// User registration request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Username (at least 2 characters).
    pub username: String,
    /// Password (at least 6 characters).
    #[validate(length(max = 1024))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    #[validate(length(max = 1024))]
    pub password: String,
}

/// Send message request.
///
/// Every field is optional at the JSON level so that missing values are
/// reported with the same messages as empty ones.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    /// Subject line.
    #[serde(default)]
    #[validate(custom(function = "no_control_chars"))]
    pub subject: Option<String>,
    /// Message body.
    #[serde(default)]
    #[validate(custom(function = "no_control_chars"))]
    pub message: Option<String>,
    /// Sending user. Only honoured for unauthenticated callers when the
    /// server allows it.
    #[serde(default)]
    pub sender_id: Option<i64>,
    /// Receiving user.
    #[serde(default)]
    pub receiver_id: Option<i64>,
}

/// Query parameters for deleting a message from a mailbox.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteMessageQuery {
    /// Which mailbox to remove the message from (`inbox` or `outbox`).
    pub listing_type: Option<String>,
}

/// Query parameters for user search.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchQuery {
    /// Username fragment.
    pub q: Option<String>,
}
