//! pacto-mcp - contract validation server
//!
//! Exposes candidate record validation, contract rendering and simulated
//! contract delivery over HTTP (default port 8081).

use anyhow::{Context, Result};
use clap::Parser;
use pacto_common::config::TomlConfig;
use pacto_common::Validator;
use pacto_mcp::services::Mailer;
use pacto_mcp::{build_router, AppState};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pacto-mcp")]
#[command(about = "Contract validation server")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides [mcp] port)
    #[arg(short, long, env = "PACTO_MCP_PORT")]
    port: Option<u16>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, source) =
        TomlConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pacto_mcp={0},pacto_common={0},tower_http=info", config.logging.level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting pacto-mcp v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &source {
        Some(path) => info!("Configuration: {}", path.display()),
        None => warn!("No configuration file found, using built-in defaults"),
    }

    let record = config
        .validation
        .canonical_record()
        .context("Failed to load canonical record")?;
    match &config.validation.canonical_record {
        Some(path) => info!("Canonical record: {}", path.display()),
        None => info!("Canonical record: built-in official data"),
    }

    let validator = Validator::new(record).with_policy(config.validation.missing_policy);
    info!("Missing value policy: {:?}", validator.policy());

    let mailer = Mailer::new(config.mail.default_recipient.clone());
    info!("Default recipient: {}", mailer.default_recipient());

    let app = build_router(AppState::new(validator, mailer));

    let port = args.port.unwrap_or(config.mcp.port);
    let addr = format!("{}:{}", config.mcp.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("pacto-mcp listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
