//! OS signal handling.
//!
//! - SIGINT / SIGTERM → graceful shutdown
//! - SIGHUP (unix) → reload the configuration file

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::config::{load_config, LoggerConfig};

/// Resolve when the process is asked to stop.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

/// Reload `path` on every SIGHUP and publish valid configs on `update_tx`.
///
/// Runs until the receiving side is dropped.
#[cfg(unix)]
pub async fn reload_on_sighup(path: PathBuf, update_tx: mpsc::UnboundedSender<LoggerConfig>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGHUP handler");
            return;
        }
    };

    while hangup.recv().await.is_some() {
        tracing::info!(path = %path.display(), "SIGHUP received, reloading configuration");
        match load_config(&path) {
            Ok(config) => {
                if update_tx.send(config).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!("Failed to reload config: {}. Keeping current configuration.", e);
            }
        }
    }
}

#[cfg(not(unix))]
pub async fn reload_on_sighup(_path: PathBuf, _update_tx: mpsc::UnboundedSender<LoggerConfig>) {}
