//! HTTP server.
//!
//! This module provides:
//! - Shared application state
//! - The axum router with CORS, tracing and body-limit layers
//! - Endpoint handlers and multipart form parsing
//! - The serve loop with graceful shutdown

mod handlers;
mod routes;

pub use handlers::*;
pub use routes::*;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::gemini::TextGenerator;
use crate::services::{ExplainService, MindMapService, ServiceCore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Virtual Professor service.
    pub explain: ExplainService,
    /// Concept visualizer service.
    pub mind_map: MindMapService,
}

impl AppState {
    /// Create new application state around a text generator
    pub fn new(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        let core = ServiceCore::new(generator);

        Self {
            config,
            explain: ExplainService::new(core.clone()),
            mind_map: MindMapService::new(core),
        }
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

/// Bind the configured address and serve until Ctrl-C / SIGTERM
pub async fn serve(state: SharedState) -> AppResult<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.server.host, state.config.server.port)
        .parse()
        .map_err(|e| AppError::Config {
            message: format!("Invalid host/port combination: {}", e),
        })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Failed to bind to {}: {}", addr, e),
        })?;

    info!(address = %addr, "Server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Server error: {}", e),
        })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
