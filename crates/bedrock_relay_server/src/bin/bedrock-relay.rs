//! Bedrock Relay Server - streams Claude output from Bedrock to browser clients.

use bedrock_relay_models::BedrockBackend;
use bedrock_relay_server::{
    AppState, ExporterKind, ServerConfig, StubSearch, init_observability, init_tracing, serve,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

const METRICS_INTERVAL_SECS: u64 = 60;

/// Command-line arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "bedrock-relay")]
#[command(about = "Bedrock Relay Server - streaming model output over HTTP")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "BEDROCK_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config = config.with_bind_addr(bind)?;
    }

    init_tracing(*config.log_format())?;
    let observability = init_observability(
        "bedrock-relay",
        ExporterKind::from_env()?,
        Duration::from_secs(METRICS_INTERVAL_SECS),
    )?;
    info!(
        bind_addr = %config.bind_addr(),
        static_dir = %config.static_dir().display(),
        "Starting Bedrock Relay Server"
    );

    if args.check {
        info!("Configuration is valid");
        observability.shutdown()?;
        return Ok(());
    }

    let backend = BedrockBackend::from_env(config.region().clone()).await;
    let search = StubSearch::new(config.search().default_index());
    let state = AppState::new(&config, Arc::new(backend), Arc::new(search));

    let listener = TcpListener::bind(config.socket_addr()?).await?;
    serve(listener, state, shutdown_signal()).await?;

    observability.shutdown()?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await
        }
    }
}
