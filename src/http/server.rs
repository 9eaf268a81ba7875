//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the append handler on the configured path
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve until the shutdown broadcast fires
//! - Apply reloaded configuration between requests

use axum::{routing::any, Router};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::LoggerConfig;
use crate::http::handler::append_message;
use crate::http::request::MakeRequestUuidV4;
use crate::observability::tracing::request_span;
use crate::storage::MessageLog;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current configuration, swapped atomically on reload.
    pub config: Arc<ArcSwap<LoggerConfig>>,
    pub log: Arc<MessageLog>,
}

impl AppState {
    pub fn new(config: LoggerConfig) -> Self {
        let log = Arc::new(MessageLog::from_config(&config.storage));
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            log,
        }
    }
}

/// HTTP server for the message logger.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: LoggerConfig) -> Self {
        let router_config = config.clone();
        let state = AppState::new(config);
        let router = build_router(&router_config, state.clone());
        Self { router, state }
    }

    /// The router, for in-process use without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs arriving on `config_updates` replace the current one.
    /// Returns once `shutdown` fires and in-flight requests have finished.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<LoggerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = %self.state.config.load().listener.path,
            log_file = %self.state.log.path().display(),
            "HTTP server starting"
        );

        let shared = self.state.config.clone();
        let reloader = tokio::spawn(async move {
            while let Some(next) = config_updates.recv().await {
                apply_reload(&shared, next);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &LoggerConfig, state: AppState) -> Router {
    Router::new()
        .route(&config.listener.path, any(append_message))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
}

/// Swap in a reloaded configuration.
///
/// Only the API key, payload policy and body limit take effect; listener
/// and storage settings are bound at startup.
pub fn apply_reload(current: &ArcSwap<LoggerConfig>, next: LoggerConfig) {
    let previous = current.load();

    if previous.listener.bind_address != next.listener.bind_address
        || previous.listener.path != next.listener.path
    {
        tracing::warn!("Listener changes require a restart; keeping the current listener");
    }
    if previous.storage.path != next.storage.path
        || previous.storage.serialize_writes != next.storage.serialize_writes
    {
        tracing::warn!(
            log_file = %previous.storage.path,
            "Storage changes require a restart; keeping the current message log"
        );
    }

    current.store(Arc::new(next));
    tracing::info!("Configuration reloaded");
}
