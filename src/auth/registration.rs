//! User registration and credential checks for Mailroom.

use tracing::{debug, info};

use crate::auth::validation::validate_registration;
use crate::auth::{hash_password, verify_password, PasswordError};
use crate::db::{NewUser, User, UserRepository};
use crate::{MailroomError, Result};

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username (at least 2 characters).
    pub username: String,
    /// Plaintext password (at least 6 characters).
    pub password: String,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Register a new user.
///
/// 1. Validates username and password
/// 2. Checks that the username is free
/// 3. Hashes the password
/// 4. Creates the user
///
/// Two concurrent registrations of the same name can both pass step 2;
/// the UNIQUE constraint on `users.username` rejects the loser, which is
/// reported as the same [`MailroomError::Conflict`].
pub async fn register(repo: &UserRepository<'_>, request: RegistrationRequest) -> Result<User> {
    validate_registration(&request.username, &request.password)?;

    if repo.username_exists(&request.username).await? {
        return Err(MailroomError::Conflict("Username already taken".to_string()));
    }

    let password_hash = hash_password(&request.password)?;
    let user = repo
        .create(&NewUser::new(&request.username, password_hash))
        .await?;

    info!(
        username = %user.username,
        user_id = user.id,
        "New user registered"
    );

    Ok(user)
}

/// Check a username/password pair.
///
/// Unknown users and wrong passwords produce the same error.
pub async fn authenticate(repo: &UserRepository<'_>, username: &str, password: &str) -> Result<User> {
    let user = repo
        .get_by_username(username)
        .await?
        .ok_or_else(|| MailroomError::Auth("Invalid username or password".to_string()))?;

    match verify_password(password, &user.password_hash) {
        Ok(()) => {}
        Err(PasswordError::Mismatch) => {
            debug!(user_id = user.id, "Wrong password");
            return Err(MailroomError::Auth("Invalid username or password".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(user)
}
