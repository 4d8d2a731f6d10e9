mod candidates;
mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod results;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::ai::llm_services;
use crate::interview::SessionRegistry;
use crate::llm_client::LlmClient;
use crate::results::{MemoryResultStore, PgResultStore, ResultStore};
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

    info!("Starting Assessment API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(&config)?;
    info!(
        "LLM client initialized (deployment: {}, call timeout: {:?})",
        config.azure_openai_deployment, config.ai_call_timeout
    );
    let services = llm_services(llm, config.ai_call_timeout);

    // Initialize result store
    let results: Arc<dyn ResultStore> = match &config.database_url {
        Some(url) => Arc::new(PgResultStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; results are kept in memory and lost on restart");
            Arc::new(MemoryResultStore::default())
        }
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        services,
        results,
        sessions: SessionRegistry::default(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
