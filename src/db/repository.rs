//! User repository for Mailroom.
//!
//! This module provides the persistence operations of the user store.

use super::user::{NewUser, User};
use super::DbPool;
use crate::{MailroomError, Result};

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// A duplicate username is reported as [`MailroomError::Conflict`]
    /// (the column carries a UNIQUE constraint).
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password_hash) VALUES (?, ?) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                MailroomError::Conflict("Username already taken".to_string())
            }
            e => MailroomError::Database(e.to_string()),
        })?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| MailroomError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, password_hash FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user by exact username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Check if a username is already taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
                .bind(username)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Find users whose username contains `fragment`.
    ///
    /// Matching follows SQLite `LIKE` collation (ASCII case-insensitive).
    /// Wildcards in `fragment` are matched literally.
    pub async fn search(&self, fragment: &str) -> Result<Vec<User>> {
        let pattern = format!("%{}%", escape_like(fragment));

        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users
             WHERE username LIKE ? ESCAPE '\\'
             ORDER BY username",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// Escape `LIKE` metacharacters using `\` as the escape character.
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&NewUser::new("testuser", "hashedpw")).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "testuser");
        assert_eq!(user.password_hash, "hashedpw");
    }

    #[tokio::test]
    async fn test_create_duplicate_username_is_conflict() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("testuser", "hashedpw")).await.unwrap();
        let result = repo.create(&NewUser::new("testuser", "otherpw")).await;

        assert!(matches!(result, Err(MailroomError::Conflict(_))));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let created = repo.create(&NewUser::new("testuser", "hashedpw")).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found.unwrap().username, "testuser");

        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_username() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("testuser", "hashedpw")).await.unwrap();

        assert!(repo.get_by_username("testuser").await.unwrap().is_some());
        assert!(repo.get_by_username("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_username_exists() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert!(!repo.username_exists("testuser").await.unwrap());
        repo.create(&NewUser::new("testuser", "pw")).await.unwrap();

        assert!(repo.username_exists("testuser").await.unwrap());
        assert!(!repo.username_exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_search_substring() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("alice", "pw")).await.unwrap();
        repo.create(&NewUser::new("bob", "pw")).await.unwrap();
        repo.create(&NewUser::new("malcolm", "pw")).await.unwrap();

        let found: Vec<_> = repo
            .search("al")
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(found, vec!["alice", "malcolm"]);

        let found = repo.search("AL").await.unwrap();
        assert_eq!(found.len(), 2);

        assert!(repo.search("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_wildcards_are_literal() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("alice", "pw")).await.unwrap();
        repo.create(&NewUser::new("snake_case", "pw")).await.unwrap();

        assert!(repo.search("%").await.unwrap().is_empty());

        let found = repo.search("_").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "snake_case");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("abc"), "abc");
        assert_eq!(escape_like("a%b_c"), "a\\%b\\_c");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
