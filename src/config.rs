//! Configuration module for Mailroom.

use serde::Deserialize;
use std::path::Path;

use crate::{MailroomError, Result};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/mailroom.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/mailroom.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the HTTP API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// Mount point of the resource endpoints (messages, users).
    #[serde(default = "default_resources_route")]
    pub resources_route: String,
    /// Mount point of the session endpoints (register, login, logout).
    #[serde(default = "default_authentication_route")]
    pub authentication_route: String,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Secret used to sign session tokens (must be set).
    #[serde(default)]
    pub session_secret: String,
    /// Name of the session cookie.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: u64,
    /// Accept `sender_id` from unauthenticated callers on message creation.
    ///
    /// Only meant for trusted service-to-service deployments.
    #[serde(default)]
    pub allow_unauthenticated_sender: bool,
    /// Base URL of the web client that unmatched paths are forwarded to.
    #[serde(default)]
    pub client_url: Option<String>,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    5000
}

fn default_resources_route() -> String {
    "/api".to_string()
}

fn default_authentication_route() -> String {
    "/auth".to_string()
}

fn default_session_cookie() -> String {
    "mailroom_session".to_string()
}

fn default_session_expiry() -> u64 {
    60 * 60 * 24 * 7 // 7 days
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            resources_route: default_resources_route(),
            authentication_route: default_authentication_route(),
            cors_origins: vec![],
            session_secret: String::new(),
            session_cookie: default_session_cookie(),
            session_expiry_secs: default_session_expiry(),
            allow_unauthenticated_sender: false,
            client_url: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(MailroomError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| MailroomError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `MAILROOM_SESSION_SECRET`: session signing secret
    /// - `MAILROOM_DATABASE_PATH`: database file path
    /// - `MAILROOM_CLIENT_URL`: web client to proxy unmatched paths to
    pub fn apply_env_overrides(&mut self) {
        if let Some(secret) = non_empty_env("MAILROOM_SESSION_SECRET") {
            self.web.session_secret = secret;
        }
        if let Some(path) = non_empty_env("MAILROOM_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(url) = non_empty_env("MAILROOM_CLIENT_URL") {
            self.web.client_url = Some(url);
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the session secret is not set
    /// - a route does not start with `/`, is `/` itself, or both routes are equal
    pub fn validate(&self) -> Result<()> {
        if self.web.session_secret.is_empty() {
            return Err(MailroomError::Config(
                "session_secret is not set. \
                 Set it in config.toml or via MAILROOM_SESSION_SECRET environment variable."
                    .to_string(),
            ));
        }

        for (name, route) in [
            ("resources_route", &self.web.resources_route),
            ("authentication_route", &self.web.authentication_route),
        ] {
            if !route.starts_with('/') || route == "/" || route.ends_with('/') {
                return Err(MailroomError::Config(format!(
                    "{name} must start with '/' and must not end with '/': {route:?}"
                )));
            }
        }

        if self.web.resources_route == self.web.authentication_route {
            return Err(MailroomError::Config(
                "resources_route and authentication_route must differ".to_string(),
            ));
        }

        if let Some(ref client_url) = self.web.client_url {
            url::Url::parse(client_url)
                .map_err(|e| MailroomError::Config(format!("invalid client_url: {e}")))?;
        }

        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
