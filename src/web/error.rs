//! HTTP error responses.
//!
//! Every failure leaves the API as
//! `{"error": {"code": "...", "message": "...", "details": {...}}}`, where
//! `details` only appears for field validation failures.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::MailroomError;

/// Machine-readable error code, one per status the API returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    /// Returned for a taken username.
    Forbidden,
    NotFound,
    InternalError,
    /// The proxied web client is unreachable.
    BadGateway,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }
}

/// An error on its way out as an HTTP response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: &'a ApiError,
}

impl ApiError {
    fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::NotFound, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::BadGateway, message)
    }

    /// Collapse `validator` failures into one 400 with per-field messages.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .map(|(field, failures)| {
                let messages = failures
                    .iter()
                    .map(|failure| match &failure.message {
                        Some(message) => message.to_string(),
                        None => format!("Invalid value for {field}"),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self {
            details: Some(details),
            ..Self::bad_request("Validation failed")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(Envelope { error: &self })).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<MailroomError> for ApiError {
    fn from(err: MailroomError) -> Self {
        match err {
            MailroomError::Validation(message) => Self::bad_request(message),
            MailroomError::Auth(message) => Self::unauthorized(message),
            MailroomError::Conflict(message) => Self::with_code(ErrorCode::Forbidden, message),
            MailroomError::NotFound(what) => Self::not_found(format!("{what} not found")),
            other => {
                tracing::error!(error = %other, "Request failed");
                Self::with_code(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}
