//! User records.

/// A registered user as stored in `users`.
///
/// Never serialized directly; the web layer converts it to a summary
/// without the hash.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC string, set once at registration.
    pub password_hash: String,
}

/// Insert payload for `users`. The hash must already be computed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}
