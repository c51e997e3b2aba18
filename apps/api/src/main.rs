mod config;
mod embedding_client;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod scoring;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding_client::EmbeddingClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Relevance API v{}", env!("CARGO_PKG_VERSION"));

    // Collaborators are built once here and shared by every request
    let embedder = EmbeddingClient::new(
        &config.embedding_api_url,
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
        config.collaborator_timeout,
    )
    .context("Failed to build embedding client")?;
    info!(
        "Embedding client initialized (model: {}, endpoint: {})",
        embedder.model(),
        config.embedding_api_url
    );

    let llm = LlmClient::new(config.google_api_key.clone(), config.collaborator_timeout)
        .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    info!(
        "Collaborator timeout {}s, degrade on feedback failure: {}",
        config.collaborator_timeout.as_secs(),
        config.degrade_on_feedback_failure
    );

    let state = AppState {
        config: config.clone(),
        embedder: Arc::new(embedder),
        text_generator: Arc::new(llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web front-end domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
