use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use financial_document_analyzer::{build_state, config::Config, create_router};

/// Financial Document Analyzer API server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory for temporary uploads (overrides DOCUMENT_WORK_DIR)
    #[arg(long, value_name = "DIR")]
    work_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "financial_document_analyzer=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(work_dir) = args.work_dir {
        config.storage.work_dir = work_dir;
    }
    info!("Configuration loaded: {:?}", config.server);

    if config.llm.active_api_key().is_none() {
        warn!(provider = %config.llm.provider, "No LLM API key configured; analysis requests will fail");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    // Create shared state
    let state = build_state(config).map_err(|e| anyhow::anyhow!("Failed to initialise: {}", e))?;
    info!(
        model = %state.config.llm.model,
        work_dir = %state.config.storage.work_dir.display(),
        search_available = state.orchestrator.toolbox().search_available(),
        "Analysis crew ready"
    );

    // Create router
    let app = create_router(state);

    // Start server
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
