//! Response DTOs for the Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::db::User;
use crate::mail::{Mailbox, MessageView};

/// Public user information. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserSummary {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// A message as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Message ID.
    pub id: i64,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// When the message was sent (RFC 3339, UTC).
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Sending user.
    pub sender: UserSummary,
    /// Receiving user.
    pub receiver: UserSummary,
}

impl From<MessageView> for MessageResponse {
    fn from(m: MessageView) -> Self {
        Self {
            id: m.id,
            subject: m.subject,
            message: m.body,
            created_at: m.created_at.to_rfc3339(),
            sender: UserSummary {
                id: m.sender_id,
                username: m.sender_username,
            },
            receiver: UserSummary {
                id: m.receiver_id,
                username: m.receiver_username,
            },
        }
    }
}

/// Both mailboxes of the caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MailboxResponse {
    /// Received messages, newest first.
    pub inbox: Vec<MessageResponse>,
    /// Sent messages, newest first.
    pub outbox: Vec<MessageResponse>,
}

impl From<Mailbox> for MailboxResponse {
    fn from(mailbox: Mailbox) -> Self {
        Self {
            inbox: mailbox.inbox.into_iter().map(Into::into).collect(),
            outbox: mailbox.outbox.into_iter().map(Into::into).collect(),
        }
    }
}
