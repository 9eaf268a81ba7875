//! Persistent storage for accepted messages.
//!
//! # Data Flow
//! ```text
//! accepted payload
//!     → message_log.rs (read file → push → rewrite file)
//!     → messages.json (pretty JSON array, arrival order)
//! ```

pub mod message_log;

pub use message_log::{nesting_depth, MessageLog, StorageError, MAX_MESSAGE_DEPTH};
