use std::sync::Arc;

use domain::error::Error as DomainError;
use domain::gateway::oidc;
use domain::{HandshakeCodec, Provider};
use log::*;
use service::config::Config;
use tokio::net::TcpListener;
use tokio::signal;

mod controller;
mod cookies;
mod error;
mod middleware;
mod negotiate;
mod params;
mod response;
pub mod router;
mod views;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};

/// Everything a request handler needs. Cheap to clone; holds no per-user state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    provider: Arc<dyn Provider>,
    handshake_codec: HandshakeCodec,
}

impl AppState {
    /// Build the state for the identity provider described by `config`.
    pub fn new(config: Config) -> core::result::Result<Self, DomainError> {
        let provider = oidc::new_provider(&config)?;
        let handshake_codec = oidc::handshake_codec(&config)?;
        Ok(Self::with_provider(config, Arc::new(provider), handshake_codec))
    }

    pub fn with_provider(
        config: Config,
        provider: Arc<dyn Provider>,
        handshake_codec: HandshakeCodec,
    ) -> Self {
        Self {
            config,
            provider,
            handshake_codec,
        }
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn handshake_codec(&self) -> &HandshakeCodec {
        &self.handshake_codec
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state.config.interface().to_string();
    let port = app_state.config.port;
    let server_url = format!("{host}:{port}");

    info!(
        "Server starting... listening for connections on http://{} ({})",
        server_url,
        app_state.config.runtime_env()
    );

    let listener = TcpListener::bind(&server_url).await?;
    let app = router::define_routes(app_state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
