//! Mail service for Mailroom.
//!
//! Orchestrates sending (one message plus its two listings, atomically)
//! and per-user listing removal.

use chrono::Utc;
use tracing::{debug, info};

use crate::db::{Database, User, UserRepository};
use crate::{MailroomError, Result};

use super::listing::ListingRepository;
use super::repository::MessageRepository;
use super::types::{
    Listing, ListingKind, Mailbox, MessageView, NewMessage, MAX_SUBJECT_LENGTH,
};

/// Request to send a message.
#[derive(Debug, Clone)]
pub struct SendMessage {
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Sending user, if one was selected.
    pub sender_id: Option<i64>,
    /// Receiving user, if one was selected.
    pub receiver_id: Option<i64>,
}

impl SendMessage {
    /// Create a new send request between two known users.
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        sender_id: i64,
        receiver_id: i64,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            sender_id: Some(sender_id),
            receiver_id: Some(receiver_id),
        }
    }
}

/// Service for mailbox operations.
pub struct MailService<'a> {
    db: &'a Database,
}

impl<'a> MailService<'a> {
    /// Create a new MailService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Send a message.
    ///
    /// The message row, the sender's outbox listing and the receiver's inbox
    /// listing are written in one transaction. On any failure nothing is
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns [`MailroomError::Validation`] if:
    /// - Subject is empty or too long
    /// - Body is empty
    /// - Sender or receiver is missing or doesn't exist
    pub async fn send(&self, request: &SendMessage) -> Result<MessageView> {
        let subject = request.subject.as_str();
        if subject.is_empty() {
            return Err(MailroomError::Validation("Missing subject".to_string()));
        }
        if subject.chars().count() > MAX_SUBJECT_LENGTH {
            return Err(MailroomError::Validation(format!(
                "Subject must be at most {MAX_SUBJECT_LENGTH} characters"
            )));
        }

        if request.body.is_empty() {
            return Err(MailroomError::Validation("Missing message".to_string()));
        }

        let sender = self
            .resolve_user(request.sender_id)
            .await?
            .ok_or_else(|| {
                MailroomError::Validation(
                    "Sending user does not exist or wasn't selected".to_string(),
                )
            })?;
        let receiver = self
            .resolve_user(request.receiver_id)
            .await?
            .ok_or_else(|| {
                MailroomError::Validation(
                    "Receiving user does not exist or wasn't selected".to_string(),
                )
            })?;

        let new_message = NewMessage::new(subject, request.body.as_str(), sender.id, receiver.id);

        // The INSERT comes first so the write lock is taken before any read.
        let mut tx = self.db.begin().await?;
        let message = MessageRepository::create(&mut *tx, &new_message, Utc::now()).await?;
        ListingRepository::insert(
            &mut *tx,
            &Listing::new(ListingKind::Outbox, sender.id, message.id),
        )
        .await?;
        ListingRepository::insert(
            &mut *tx,
            &Listing::new(ListingKind::Inbox, receiver.id, message.id),
        )
        .await?;
        tx.commit().await?;

        info!(
            message_id = message.id,
            sender_id = sender.id,
            receiver_id = receiver.id,
            "Message sent"
        );

        Ok(MessageView {
            id: message.id,
            subject: message.subject,
            body: message.body,
            created_at: message.created_at,
            sender_id: sender.id,
            sender_username: sender.username,
            receiver_id: receiver.id,
            receiver_username: receiver.username,
        })
    }

    /// Get a message by ID.
    pub async fn get_message(&self, id: i64) -> Result<MessageView> {
        MessageRepository::get_view(self.db.pool(), id)
            .await?
            .ok_or_else(|| MailroomError::NotFound("message".to_string()))
    }

    /// List a user's received messages, newest first.
    pub async fn list_inbox(&self, user_id: i64) -> Result<Vec<MessageView>> {
        ListingRepository::list(self.db.pool(), ListingKind::Inbox, user_id).await
    }

    /// List a user's sent messages, newest first.
    pub async fn list_outbox(&self, user_id: i64) -> Result<Vec<MessageView>> {
        ListingRepository::list(self.db.pool(), ListingKind::Outbox, user_id).await
    }

    /// Both mailboxes of a user.
    pub async fn mailbox(&self, user_id: i64) -> Result<Mailbox> {
        Ok(Mailbox {
            inbox: self.list_inbox(user_id).await?,
            outbox: self.list_outbox(user_id).await?,
        })
    }

    /// Remove a message from one of the user's own mailboxes.
    ///
    /// Only the caller's listing of the given kind is deleted; the message
    /// and the other party's listing stay.
    pub async fn remove_listing(
        &self,
        user_id: i64,
        message_id: i64,
        kind: ListingKind,
    ) -> Result<()> {
        let removed =
            ListingRepository::remove(self.db.pool(), user_id, message_id, kind).await?;

        if !removed {
            debug!(user_id, message_id, %kind, "No listing to remove");
            return Err(MailroomError::NotFound("listing".to_string()));
        }

        info!(user_id, message_id, %kind, "Listing removed");
        Ok(())
    }

    async fn resolve_user(&self, id: Option<i64>) -> Result<Option<User>> {
        match id {
            Some(id) => UserRepository::new(self.db.pool()).get_by_id(id).await,
            None => Ok(None),
        }
    }
}
