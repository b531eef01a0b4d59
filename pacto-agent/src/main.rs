//! pacto-agent - free-text contract intake service
//!
//! Extracts contract records from free text with an LLM, validates them
//! through pacto-mcp and returns the rendered contract or a follow-up
//! question (default port 8082).

use anyhow::{Context, Result};
use clap::Parser;
use pacto_agent::services::{LlmProvider, McpClient};
use pacto_agent::{build_router, AppState};
use pacto_common::config::TomlConfig;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pacto-agent")]
#[command(about = "Free-text contract intake service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides [agent] port)
    #[arg(short, long, env = "PACTO_AGENT_PORT")]
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
                format!("pacto_agent={},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting pacto-agent v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &source {
        Some(path) => info!("Configuration: {}", path.display()),
        None => warn!("No configuration file found, using built-in defaults"),
    }

    let llm = LlmProvider::from_config(&config.llm)
        .with_context(|| format!("Failed to initialize LLM provider '{}'", config.llm.provider))?;
    if let LlmProvider::Ollama(client) = &llm {
        info!("Ollama API: {} (model {})", client.api_url(), client.model());
        if !client.probe().await {
            warn!("Ollama is not answering yet; requests will fail until it does");
        }
    }

    let mcp = McpClient::new(
        &config.agent.mcp_server_url,
        Duration::from_secs(config.agent.mcp_timeout_secs),
    )
    .context("Failed to create MCP client")?;
    info!("MCP server: {}", mcp.base_url());

    let app = build_router(AppState::new(llm, mcp, config.mail.default_recipient.clone()));

    let port = args.port.unwrap_or(config.agent.port);
    let addr = format!("{}:{}", config.agent.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("pacto-agent listening on http://{}", addr);
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
