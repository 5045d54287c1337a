//! Body extraction with `validator` rules applied.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::web::error::ApiError;

/// `Json<T>` followed by `T::validate()`.
///
/// Both a body that doesn't parse and one that breaks a rule become a
/// 400 [`ApiError`], so handlers only ever see checked input.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text()))
            })?;
        value.validate().map_err(ApiError::from_validation_errors)?;
        Ok(Self(value))
    }
}

/// Reject text with control characters other than line breaks and tabs.
pub fn no_control_chars(value: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| matches!(c, '\n' | '\r' | '\t');
    match value.chars().find(|&c| c.is_control() && !allowed(c)) {
        None => Ok(()),
        Some(_) => Err(ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters".into())),
    }
}
