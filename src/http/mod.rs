//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign/propagate request ID)
//!     → handler.rs (API key, body, payload, append)
//!     → payload.rs (parse + truthiness rules)
//!     → storage::MessageLog
//!     → JSON response to client
//! ```

pub mod handler;
pub mod payload;
pub mod request;
pub mod server;

pub use handler::append_message;
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
