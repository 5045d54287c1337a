//! Message and listing types for Mailroom.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MailroomError;

/// Maximum length for a message subject.
pub const MAX_SUBJECT_LENGTH: usize = 225;

/// Which view of a message a listing represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// The receiver's copy.
    Inbox,
    /// The sender's copy.
    Outbox,
}

impl ListingKind {
    /// Value stored in the `listings.kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Inbox => "inbox",
            ListingKind::Outbox => "outbox",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingKind {
    type Err = MailroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbox" => Ok(ListingKind::Inbox),
            "outbox" => Ok(ListingKind::Outbox),
            other => Err(MailroomError::Validation(format!(
                "Unknown listing type: {other}"
            ))),
        }
    }
}

/// A stored message. Content never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Message {
    /// Message ID.
    pub id: i64,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Sending user ID.
    pub sender_id: i64,
    /// Receiving user ID.
    pub receiver_id: i64,
    /// When the message was sent (UTC).
    pub created_at: DateTime<Utc>,
}

/// Data for creating a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Sending user ID.
    pub sender_id: i64,
    /// Receiving user ID.
    pub receiver_id: i64,
}

impl NewMessage {
    /// Create a new message.
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        sender_id: i64,
        receiver_id: i64,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            sender_id,
            receiver_id,
        }
    }
}

/// A message as it appears in a mailbox, with both parties' usernames.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MessageView {
    pub id: i64,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub sender_id: i64,
    pub sender_username: String,
    pub receiver_id: i64,
    pub receiver_username: String,
}

/// A record placing a message in one user's inbox or outbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Listing {
    /// Mailbox kind.
    pub kind: ListingKind,
    /// Owning user.
    pub user_id: i64,
    /// Listed message.
    pub message_id: i64,
}

impl Listing {
    /// Create a listing.
    pub fn new(kind: ListingKind, user_id: i64, message_id: i64) -> Self {
        Self {
            kind,
            user_id,
            message_id,
        }
    }
}

/// Both mailboxes of one user.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    /// Received messages, newest first.
    pub inbox: Vec<MessageView>,
    /// Sent messages, newest first.
    pub outbox: Vec<MessageView>,
}
