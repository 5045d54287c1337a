//! Input validation for Mailroom user registration.

use thiserror::Error;

use crate::MailroomError;

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 2;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 80;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is too short.
    #[error("username must be at least {MIN_USERNAME_LENGTH} characters")]
    UsernameTooShort,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains whitespace or control characters.
    #[error("username must not contain whitespace or control characters")]
    UsernameInvalidChars,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
}

impl From<ValidationError> for MailroomError {
    fn from(e: ValidationError) -> Self {
        MailroomError::Validation(e.to_string())
    }
}

/// Validate a username.
///
/// # Examples
///
/// ```
/// use mailroom::auth::validation::validate_username;
///
/// assert!(validate_username("al").is_ok());
/// assert!(validate_username("a").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if len > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate a password.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Validate all registration fields.
pub fn validate_registration(username: &str, password: &str) -> Result<(), ValidationError> {
    validate_username(username)?;
    validate_password(password)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_length() {
        assert_eq!(validate_username(""), Err(ValidationError::UsernameTooShort));
        assert_eq!(validate_username("a"), Err(ValidationError::UsernameTooShort));
        assert!(validate_username("ab").is_ok());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH)).is_ok());
        assert_eq!(
            validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)),
            Err(ValidationError::UsernameTooLong)
        );
    }

    #[test]
    fn test_validate_username_chars() {
        assert!(validate_username("john_doe").is_ok());
        assert!(validate_username("ユーザー").is_ok());
        assert_eq!(
            validate_username("john doe"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_username("john\x00"),
            Err(ValidationError::UsernameInvalidChars)
        );
    }

    #[test]
    fn test_validate_password() {
        assert_eq!(validate_password("12345"), Err(ValidationError::PasswordTooShort));
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_validation_error_into_mailroom_error() {
        let err: MailroomError = ValidationError::PasswordTooShort.into();
        assert!(matches!(err, MailroomError::Validation(_)));
    }
}
