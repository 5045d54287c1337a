//! Tracing setup for the Mailroom binary.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{MailroomError, Result};

/// Per-statement sqlx logging drowns out request traces.
const QUIET_TARGETS: &[&str] = &["sqlx=warn", "hyper=warn", "reqwest=warn"];

fn level_from_str(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

/// Build the filter: `RUST_LOG` when set, otherwise the configured level
/// with chatty dependencies turned down.
fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    QUIET_TARGETS.iter().fold(
        EnvFilter::new(level_from_str(level).as_str()),
        |filter, target| match target.parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    )
}

/// Install the global subscriber.
///
/// Logs go to stdout and are appended to `config.file` when it is non-empty.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if config.file.is_empty() {
        init_console_only(&config.level);
        return Ok(());
    }

    let path = Path::new(&config.file);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(Arc::new(log_file)))
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(&config.level))
        .try_init()
        .map_err(|e| MailroomError::Config(format!("logging already initialised: {e}")))
}

/// Console-only logging, used when the log file can't be opened.
pub fn init_console_only(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(build_filter(level))
        .try_init();
}
