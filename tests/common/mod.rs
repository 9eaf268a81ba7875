//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use message_logger::config::LoggerConfig;
use message_logger::http::HttpServer;
use message_logger::lifecycle::Shutdown;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower::ServiceExt;

pub const API_KEY: &str = "secret123";

/// A valid configuration whose message log lives in `dir`.
pub fn test_config(dir: &Path) -> LoggerConfig {
    let mut config = LoggerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.auth.api_key = API_KEY.to_string();
    config.storage.path = dir.join("messages.json").to_string_lossy().into_owned();
    config
}

pub fn log_path(config: &LoggerConfig) -> PathBuf {
    PathBuf::from(&config.storage.path)
}

/// Parsed contents of the message log, or `None` if it does not exist.
pub fn read_log(config: &LoggerConfig) -> Option<Value> {
    let raw = std::fs::read(log_path(config)).ok()?;
    Some(serde_json::from_slice(&raw).expect("message log is valid JSON"))
}

pub fn post(key: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/");
    if let Some(key) = key {
        builder = builder.header("X-Api-Key", key);
    }
    builder.body(body.into()).unwrap()
}

/// Drive one request through the router in-process.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// A running server bound to an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<LoggerConfig>,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

pub async fn start_server(config: LoggerConfig) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (config_updates, update_rx) = mpsc::unbounded_channel();

    let server = HttpServer::new(config);
    let handle = tokio::spawn(async move { server.run(listener, update_rx, server_shutdown).await });

    RunningServer {
        addr,
        shutdown,
        config_updates,
        handle,
    }
}
