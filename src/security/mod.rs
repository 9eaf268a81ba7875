//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → api_key.rs (X-Api-Key must equal the configured secret)
//!     → Pass to body handling
//! ```
//!
//! # Design Decisions
//! - Fail closed: a missing header is the same as a wrong one
//! - The check runs before the body is read

pub mod api_key;

pub use api_key::{check_api_key, X_API_KEY};
