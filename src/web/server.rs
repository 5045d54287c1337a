//! Web server for Mailroom.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::WebConfig;
use crate::{Database, MailroomError, Result};

use super::handlers::AppState;
use super::proxy::ClientProxy;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Fully layered router.
    router: Router,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// `config.host` must be an IP address.
    pub fn new(config: &WebConfig, db: Arc<Database>) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| MailroomError::Config(format!("invalid web server address: {e}")))?;

        let proxy = config
            .client_url
            .as_deref()
            .map(ClientProxy::new)
            .transpose()?;
        if let Some(proxy) = &proxy {
            tracing::info!("Forwarding unmatched paths to {}", proxy.base());
        }

        let app_state = Arc::new(AppState::new(db, config));

        Ok(Self {
            addr,
            router: create_router(app_state, config, proxy),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server until Ctrl-C.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, self.router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down web server");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> WebConfig {
        WebConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            session_secret: "test-secret-key".to_string(),
            ..WebConfig::default()
        }
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let db = Database::open_in_memory().await.unwrap();
        let server = WebServer::new(&create_test_config(), Arc::new(db)).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_bad_host() {
        let db = Database::open_in_memory().await.unwrap();
        let config = WebConfig {
            host: "not an ip".to_string(),
            ..create_test_config()
        };
        assert!(matches!(
            WebServer::new(&config, Arc::new(db)),
            Err(MailroomError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let db = Database::open_in_memory().await.unwrap();
        let server = WebServer::new(&create_test_config(), Arc::new(db)).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let resp = reqwest::Client::new()
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(resp.text().await.unwrap(), "OK");
    }
}
