//! Mail module for Mailroom.
//!
//! This module provides private messaging between users:
//! - Message content stored once per message
//! - Inbox and outbox listings projecting a message into each mailbox
//! - Transactional sending and per-user listing removal

mod listing;
mod repository;
mod service;
mod types;

pub use listing::ListingRepository;
pub use repository::MessageRepository;
pub use service::{MailService, SendMessage};
pub use types::{
    Listing, ListingKind, Mailbox, Message, MessageView, NewMessage, MAX_SUBJECT_LENGTH,
};
