//! API handlers.

pub mod auth;
pub mod messages;
pub mod users;

pub use auth::*;
pub use messages::*;
pub use users::*;
