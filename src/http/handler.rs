//! The append handler.
//!
//! One linear pass per request, stopping at the first failure:
//! API key → body read → JSON parse → load log → append → persist → respond.
//! Nothing touches the log file until every validation step has passed.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use crate::error::LoggerError;
use crate::http::payload::parse_payload;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::api_key::check_api_key;

/// Append the request body to the message log.
pub async fn append_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<Value>, LoggerError> {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    let result = process(&state, &headers, body).await;

    match &result {
        Ok(len) => {
            tracing::info!(request_id = %request_id, messages = len, "Message appended");
            metrics::record_request("ok", start_time);
            metrics::record_log_length(*len);
        }
        Err(LoggerError::Storage(e)) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to persist message");
            metrics::record_request("storage_error", start_time);
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, reason = %e, "Request rejected");
            metrics::record_request(e.outcome(), start_time);
        }
    }

    result.map(|_| Json(json!({ "status": "ok" })))
}

async fn process(state: &AppState, headers: &HeaderMap, body: Body) -> Result<usize, LoggerError> {
    // One snapshot per request so a reload mid-request cannot mix settings.
    let config = state.config.load_full();

    check_api_key(headers, &config.auth.api_key)?;

    let raw = axum::body::to_bytes(body, config.limits.max_body_size)
        .await
        .map_err(|_| LoggerError::NoData)?;

    let payload = parse_payload(&raw, config.payload.policy)?;

    Ok(state.log.append(payload).await?)
}
