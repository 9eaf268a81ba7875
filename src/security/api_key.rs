//! Shared-secret authentication via the `X-Api-Key` header.

use axum::http::HeaderMap;

use crate::error::LoggerError;

/// Header carrying the caller's key. Header names are case-insensitive,
/// so clients sending `X-API-KEY` match too.
pub const X_API_KEY: &str = "x-api-key";

/// Accept the request only if the header is present and byte-for-byte equal
/// to `expected`.
pub fn check_api_key(headers: &HeaderMap, expected: &str) -> Result<(), LoggerError> {
    match headers.get(X_API_KEY) {
        Some(provided) if provided.as_bytes() == expected.as_bytes() => Ok(()),
        _ => Err(LoggerError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    fn headers_with(key: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"X-API-KEY").unwrap(),
            HeaderValue::from_static(key),
        );
        headers
    }

    #[test]
    fn matching_key_passes() {
        assert!(check_api_key(&headers_with("secret123"), "secret123").is_ok());
    }

    #[test]
    fn wrong_key_is_rejected() {
        assert!(matches!(
            check_api_key(&headers_with("wrong"), "secret123"),
            Err(LoggerError::Unauthorized)
        ));
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(check_api_key(&HeaderMap::new(), "secret123").is_err());
    }

    #[test]
    fn comparison_is_exact() {
        assert!(check_api_key(&headers_with("Secret123"), "secret123").is_err());
        assert!(check_api_key(&headers_with("secret1234"), "secret123").is_err());
        assert!(check_api_key(&headers_with("secret12"), "secret123").is_err());
    }
}
