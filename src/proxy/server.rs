//! Router and server setup

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handler;
use crate::config::AppConfig;
use crate::prompt::ToolKind;
use crate::upstream::{CompletionBackend, TogetherClient};

/// Shared state for the proxy. Read-only after startup.
#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn CompletionBackend>,
}

impl ProxyState {
    pub fn new(config: AppConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }
}

/// Build the application router: `/api/*` tools plus static files
pub fn router(state: ProxyState) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/api/health", get(handler::health))
        .route(ToolKind::Text.route(), post(handler::generate_text))
        .route(ToolKind::Chat.route(), post(handler::chat))
        .route(ToolKind::Code.route(), post(handler::generate_code))
        .route(ToolKind::Summarize.route(), post(handler::summarize))
        .route(ToolKind::Translate.route(), post(handler::translate))
        // `/` resolves to index.html
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the proxy server until Ctrl-C
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let backend = TogetherClient::from_config(&config.backend)?;
    tracing::info!(
        endpoint = %backend.completions_url(),
        timeout_seconds = config.backend.timeout_seconds,
        "Completion backend configured"
    );

    if !config.server.static_dir.is_dir() {
        tracing::warn!(
            static_dir = %config.server.static_dir.display(),
            "Static directory not found; frontend routes will return 404"
        );
    }

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;

    let app = router(ProxyState::new(config, Arc::new(backend)));

    tracing::info!("qwikgen-proxy listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
