use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use doc_classifier::{
    classifier::DocumentClassifier, config::Config, create_router, utils::init_logger, AppState,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "AI-powered document classification and routing service")]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!("Configuration loaded: {:?}", config.server);
    info!(provider = %config.llm.provider, model = %config.llm.model, "LLM provider selected");

    let classifier = DocumentClassifier::from_config(&config)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    // Create shared state and router
    let state = AppState::new(config, classifier);
    let app = create_router(state);

    info!("Starting Document Classifier service on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down Document Classifier service");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
