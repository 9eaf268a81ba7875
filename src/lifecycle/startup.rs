//! Startup orchestration.
//!
//! Order: load config → logging → metrics → bind → background tasks → serve.
//! Any startup error is fatal; traffic is only accepted once everything
//! before it has succeeded.

use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::validation::validate_config;
use crate::config::watcher::ConfigWatcher;
use crate::config::{load_config, ConfigError, LoggerConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub config_path: PathBuf,
    pub bind_override: Option<String>,
    pub watch: bool,
}

/// Load the configuration and apply command-line overrides.
pub fn prepare_config(options: &StartupOptions) -> Result<LoggerConfig, ConfigError> {
    let mut config = load_config(&options.config_path)?;

    if let Some(bind) = &options.bind_override {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    Ok(config)
}

/// Start the logger and block until it has shut down.
pub async fn run(options: StartupOptions) -> Result<(), Box<dyn Error>> {
    let config = prepare_config(&options)?;

    logging::init_logging(&config.observability);

    tracing::info!("message-logger v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = %options.config_path.display(),
        bind_address = %config.listener.bind_address,
        path = %config.listener.path,
        log_file = %config.storage.path,
        payload_policy = ?config.payload.policy,
        serialize_writes = config.storage.serialize_writes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // validated on load
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (update_tx, update_rx) = mpsc::unbounded_channel();

    // Kept alive for the lifetime of the server.
    let _watcher = if options.watch {
        Some(ConfigWatcher::new(&options.config_path, update_tx.clone()).run()?)
    } else {
        None
    };

    tokio::spawn(signals::reload_on_sighup(options.config_path.clone(), update_tx));
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config);
    server.run(listener, update_rx, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
