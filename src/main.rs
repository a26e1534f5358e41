use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edumind_backend::{
    config::{Config, LogFormat},
    gemini::GeminiClient,
    server::{self, AppState},
};

/// EduMind study assistant backend
#[derive(Debug, Parser)]
#[command(name = "edumind-backend", version, about)]
struct Cli {
    /// Address to bind (overrides SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "EduMind backend starting..."
    );

    // Initialize Gemini client
    let client = match GeminiClient::new(&config.gemini, config.request.clone()) {
        Ok(c) => {
            info!(
                base_url = %c.base_url(),
                model = %c.model(),
                timeout_ms = config.request.timeout_ms,
                "Gemini client initialized"
            );
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Gemini client");
            return Err(e.into());
        }
    };

    info!(
        origins = ?config.server.cors_allowed_origins,
        max_upload_bytes = config.server.max_upload_bytes,
        "CORS and upload limits configured"
    );

    // Create application state
    let state = Arc::new(AppState::new(config, Arc::new(client)));

    if let Err(e) = server::serve(state).await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
