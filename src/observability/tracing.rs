//! Per-request spans.
//!
//! Every request runs inside a span carrying method, path and the request
//! ID, so handler log lines can be correlated with the access log.

use axum::{body::Body, http::Request};
use tracing::Span;

use crate::http::request::request_id;

/// Span factory for `TraceLayer::make_span_with`.
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request.headers()),
    )
}
