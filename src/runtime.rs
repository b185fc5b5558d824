use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::routes;

/// Owns a [`ServerConfig`] and serves a router with it.
pub struct ResponderRuntime {
    config: ServerConfig,
}

impl ResponderRuntime {
    /// Creates a runtime with the provided configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Consumes the runtime and starts serving the supplied router.
    pub async fn serve(self, router: Router) -> Result<()> {
        serve(router, self.config).await
    }
}

/// Serves the router with the provided configuration until Ctrl-C or SIGTERM.
pub async fn serve(router: Router, config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "responder listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("responder stopped");
    Ok(())
}

/// Loads [`ServerConfig`] from the environment and serves the responder routes.
pub async fn run() -> Result<()> {
    let config = ServerConfig::from_env()?;
    ResponderRuntime::new(config).serve(routes::router()).await
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to install SIGTERM handler; waiting for ctrl-c only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("shutdown signal received");
}
