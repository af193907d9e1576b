mod config;
mod errors;
mod extraction;
mod interview;
mod llm_client;
mod pages;
mod routes;
mod session;
mod state;
mod upload;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, SessionBackend};
use crate::llm_client::{CompletionModel, LlmClient};
use crate::routes::build_router;
use crate::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview Prep v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.llm_base_url,
        config.llm_model.clone(),
        config.llm_flavor,
    )?;
    info!(
        "LLM client initialized (model: {}, api: {})",
        llm.model(),
        llm.flavor()
    );

    // Initialize session store
    let sessions = build_session_store(&config)?;

    let state = AppState {
        llm: Arc::new(llm),
        sessions,
    };

    // Build router
    let app = build_router(state, config.max_upload_bytes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the session backend named in config. Redis is opened lazily; the
/// first request that touches a session establishes the connection.
fn build_session_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    match &config.session_backend {
        SessionBackend::Memory => {
            info!(
                "Session store: in-memory (ttl {}s)",
                config.session_ttl_secs
            );
            Ok(Arc::new(MemorySessionStore::new(Duration::from_secs(
                config.session_ttl_secs,
            ))))
        }
        SessionBackend::Redis { url } => {
            let client = redis::Client::open(url.as_str())?;
            info!("Session store: redis (ttl {}s)", config.session_ttl_secs);
            Ok(Arc::new(RedisSessionStore::new(
                client,
                config.session_ttl_secs,
            )))
        }
    }
}
