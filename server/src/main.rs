//! Chatlens server binary.

use anyhow::{Context, Result};
use chatlens_analysis::{AnalysisSession, IntentClassifier};
use chatlens_server::{AppState, ServerArgs, build_router};
use clap::Parser;
use dotenv::dotenv;
use tracing::info;

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's env fallbacks can see it
    dotenv().ok();

    let args = ServerArgs::parse();
    init_logging(&args.log_level);

    let session = AnalysisSession::new(args.analysis_config()?);
    let classifier = IntentClassifier::new(args.build_provider()?);
    info!(
        provider = classifier.provider_name(),
        model = classifier.model().unwrap_or("default"),
        "Intent classifier ready"
    );

    let app = build_router(
        AppState::new(session, classifier),
        args.cors_layer()?,
        args.upload_limit_bytes(),
    );

    let addr = args.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
