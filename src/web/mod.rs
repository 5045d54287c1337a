//! Web API module for Mailroom.
//!
//! This module provides the HTTP surface: session endpoints, the mailbox
//! and user search resources, and the reverse proxy to the web client.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod proxy;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use proxy::ClientProxy;
pub use router::{create_router, ApiDoc};
pub use server::WebServer;
