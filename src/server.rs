//! HTTP server lifecycle: base-path nesting, middleware, resilient bind,
//! and graceful shutdown.
//!
//! The bind is deliberately forgiving about one specific failure: a busy
//! port. The configured port gets exactly one fallback attempt (8081 when
//! the configured port was the 8080 default, otherwise port + 1); a second
//! conflict, or any other bind error, is fatal. Everything a human needs to
//! reach the service is logged once the listener is up, with `0.0.0.0`
//! rewritten to `localhost` so the printed URL is clickable.

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::{Config, DEFAULT_PORT};
use crate::error::Result;
use crate::middleware;

pub const FALLBACK_PORT: u16 = 8081;

pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Bind and serve until a termination signal. Returns only after the
    /// listener has stopped accepting; callers release persistence after
    /// this returns.
    pub async fn serve(self, api: Router) -> Result<()> {
        let base_path = self.config.server.base_path().to_string();
        let app = if base_path.is_empty() {
            api
        } else {
            Router::new().nest(&format!("/{base_path}"), api)
        };
        let app = middleware::apply(app);

        let (listener, port) =
            bind_with_fallback(&self.config.server.host, self.config.server.port).await?;

        let url = effective_url(&self.config.server.host, port, &base_path);
        tracing::info!("Application started at {url}");
        tracing::info!("Press Ctrl+C to stop...");
        tracing::info!("Try: {url}categories?page=0&size=5");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Listener stopped");
        Ok(())
    }
}

/// The port tried after a conflict on `port`.
pub fn fallback_port(port: u16) -> u16 {
    if port == DEFAULT_PORT {
        FALLBACK_PORT
    } else {
        port.saturating_add(1)
    }
}

/// Bind the configured port, retrying exactly once on a busy-port error.
pub async fn bind_with_fallback(host: &str, port: u16) -> Result<(TcpListener, u16)> {
    match TcpListener::bind((host, port)).await {
        Ok(listener) => Ok((listener, port)),
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            let fallback = fallback_port(port);
            tracing::warn!("Port {port} is busy. Falling back to {fallback}");
            let listener = TcpListener::bind((host, fallback)).await?;
            Ok((listener, fallback))
        }
        Err(err) => Err(err.into()),
    }
}

fn effective_url(host: &str, port: u16, base_path: &str) -> String {
    let display_host = if host == "0.0.0.0" { "localhost" } else { host };
    if base_path.is_empty() {
        format!("http://{display_host}:{port}/")
    } else {
        format!("http://{display_host}:{port}/{base_path}/")
    }
}

/// Wait for SIGTERM or SIGINT.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}
