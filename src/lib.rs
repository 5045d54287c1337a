//! Mailroom - private messaging backend
//!
//! Users register, log in and exchange messages. Each message is stored
//! once and appears in the sender's outbox and the receiver's inbox through
//! independent listings, so either side can remove it from their own
//! mailbox without affecting the other.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod web;

pub use auth::{
    authenticate, hash_password, register, verify_password, PasswordError, RegistrationRequest,
    SessionClaims, SessionError, SessionKeys, ValidationError,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{MailroomError, Result};
pub use mail::{ListingKind, MailService, Mailbox, MessageView, SendMessage};
pub use web::WebServer;
