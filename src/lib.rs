//! Message logger library: authenticated append of JSON payloads to a
//! JSON array file.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod storage;

pub use config::schema::LoggerConfig;
pub use error::LoggerError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use storage::MessageLog;
