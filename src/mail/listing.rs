//! Listing index for Mailroom.
//!
//! A listing places one message in one user's inbox or outbox. Messages are
//! stored once; mailboxes are read through listings, and removing a listing
//! never touches the message or the other party's listing.

use sqlx::SqliteExecutor;

use super::repository::VIEW_COLUMNS;
use super::types::{Listing, ListingKind, MessageView};
use crate::Result;

#[cfg(test)]
#[derive(sqlx::FromRow)]
struct ListingRow {
    kind: String,
    user_id: i64,
    message_id: i64,
}

#[cfg(test)]
impl TryFrom<ListingRow> for Listing {
    type Error = crate::MailroomError;

    fn try_from(row: ListingRow) -> Result<Self> {
        Ok(Listing::new(row.kind.parse()?, row.user_id, row.message_id))
    }
}

/// Repository for listing rows.
pub struct ListingRepository;

impl ListingRepository {
    /// Insert a listing.
    ///
    /// Fails if the same (kind, user, message) listing already exists.
    pub async fn insert<'e, E>(executor: E, listing: &Listing) -> Result<()>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query("INSERT INTO listings (kind, user_id, message_id) VALUES (?, ?, ?)")
            .bind(listing.kind.as_str())
            .bind(listing.user_id)
            .bind(listing.message_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// List the messages in one user's mailbox, newest first.
    pub async fn list<'e, E>(executor: E, kind: ListingKind, user_id: i64) -> Result<Vec<MessageView>>
    where
        E: SqliteExecutor<'e>,
    {
        let sql = format!(
            r#"
            SELECT {VIEW_COLUMNS}
            FROM listings l
            JOIN messages m ON m.id = l.message_id
            JOIN users s ON s.id = m.sender_id
            JOIN users r ON r.id = m.receiver_id
            WHERE l.kind = ? AND l.user_id = ?
            ORDER BY m.created_at DESC, m.id DESC
            "#
        );

        let messages = sqlx::query_as::<_, MessageView>(&sql)
            .bind(kind.as_str())
            .bind(user_id)
            .fetch_all(executor)
            .await?;

        Ok(messages)
    }

    /// Remove the listing matching (kind, user, message).
    ///
    /// Returns `false` if there was no such listing.
    pub async fn remove<'e, E>(
        executor: E,
        user_id: i64,
        message_id: i64,
        kind: ListingKind,
    ) -> Result<bool>
    where
        E: SqliteExecutor<'e>,
    {
        let result =
            sqlx::query("DELETE FROM listings WHERE kind = ? AND user_id = ? AND message_id = ?")
                .bind(kind.as_str())
                .bind(user_id)
                .bind(message_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All listings that reference a message.
    #[cfg(test)]
    pub(crate) async fn for_message<'e, E>(executor: E, message_id: i64) -> Result<Vec<Listing>>
    where
        E: SqliteExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, ListingRow>(
            "SELECT kind, user_id, message_id FROM listings WHERE message_id = ? ORDER BY kind",
        )
        .bind(message_id)
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    /// Count all listing rows.
    pub async fn count<'e, E>(executor: E) -> Result<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
