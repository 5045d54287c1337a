use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use mailroom::{Config, Database, WebServer};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = mailroom::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        mailroom::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Mailroom starting");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to open database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match WebServer::new(&config.web, db) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure web server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
