//! Authentication module for Mailroom.
//!
//! This module provides password hashing, user registration,
//! credential checks and session tokens.

mod password;
mod registration;
mod session;
pub mod validation;

pub use password::{hash_password, verify_password, PasswordError};
pub use registration::{authenticate, register, RegistrationRequest};
pub use session::{SessionClaims, SessionError, SessionKeys};
pub use validation::ValidationError;
