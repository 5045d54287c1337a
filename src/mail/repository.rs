//! Message repository for Mailroom.
//!
//! Functions take any SQLite executor so they can run either on the pool
//! or inside the transaction opened by [`MailService::send`].
//!
//! [`MailService::send`]: super::MailService::send

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use super::types::{Message, MessageView, NewMessage};
use crate::Result;

/// Columns selected for a [`MessageView`], with `m` aliasing `messages`.
pub(super) const VIEW_COLUMNS: &str = r#"
    m.id, m.subject, m.body, m.created_at,
    m.sender_id, s.username AS sender_username,
    m.receiver_id, r.username AS receiver_username
"#;

/// Repository for message rows.
pub struct MessageRepository;

impl MessageRepository {
    /// Insert a message.
    pub async fn create<'e, E>(
        executor: E,
        message: &NewMessage,
        created_at: DateTime<Utc>,
    ) -> Result<Message>
    where
        E: SqliteExecutor<'e>,
    {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (subject, body, sender_id, receiver_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, subject, body, sender_id, receiver_id, created_at
            "#,
        )
        .bind(&message.subject)
        .bind(&message.body)
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .bind(created_at)
        .fetch_one(executor)
        .await?;

        Ok(message)
    }

    /// Get a message with sender and receiver usernames.
    pub async fn get_view<'e, E>(executor: E, id: i64) -> Result<Option<MessageView>>
    where
        E: SqliteExecutor<'e>,
    {
        let sql = format!(
            r#"
            SELECT {VIEW_COLUMNS}
            FROM messages m
            JOIN users s ON s.id = m.sender_id
            JOIN users r ON r.id = m.receiver_id
            WHERE m.id = ?
            "#
        );

        let view = sqlx::query_as::<_, MessageView>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(view)
    }

    /// Count all message rows.
    pub async fn count<'e, E>(executor: E) -> Result<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
