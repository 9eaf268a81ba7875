//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, or JSON for legacy deployments)
//!     → loader.rs (parse, apply API_KEY override)
//!     → validation.rs (semantic checks)
//!     → LoggerConfig (validated, immutable)
//!     → shared via Arc<ArcSwap<_>> with the handler
//!
//! On reload (file change or SIGHUP):
//!     watcher.rs / lifecycle::signals detects it
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the shared config
//!     → next request sees the new API key
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults except the API key
//! - Storage path and listener are fixed at startup

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, ListenerConfig, LoggerConfig, ObservabilityConfig, PayloadPolicy, StorageConfig,
};
