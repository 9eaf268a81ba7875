//! The message log file: a single JSON array rewritten on every append.
//!
//! Each append reads the whole file, pushes one value and writes the whole
//! file back. Without `serialize_writes` two concurrent appends may lose one
//! of the updates; with it, appends within this process take turns on a lock.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::StorageConfig;

/// Deepest container nesting a single message may have.
///
/// `serde_json` refuses documents nested more than 127 containers deep and
/// the log array itself adds one level, so anything deeper would make the
/// whole file unreadable on the next load.
pub const MAX_MESSAGE_DEPTH: usize = 126;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read message log {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write message log {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("message nested {depth} levels deep, limit is {}", MAX_MESSAGE_DEPTH)]
    TooDeep { depth: usize },

    #[error("failed to encode message log: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle on the JSON array file holding every accepted payload.
pub struct MessageLog {
    path: PathBuf,
    write_lock: Option<Mutex<()>>,
}

impl MessageLog {
    /// Bind to `path` with unsynchronized read-modify-write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: None,
        }
    }

    /// Bind to `path`, serializing appends made through this handle.
    pub fn serialized(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Some(Mutex::new(())),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        if config.serialize_writes {
            Self::serialized(&config.path)
        } else {
            Self::new(&config.path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current sequence.
    ///
    /// A missing file is an empty log. Content that is not a JSON array is
    /// also treated as empty; it is replaced on the next successful append.
    pub async fn load(&self) -> Result<Vec<Value>, StorageError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_slice::<Vec<Value>>(&raw) {
            Ok(messages) => Ok(messages),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Message log is not a JSON array, starting from an empty log"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Append `payload` as the last element and rewrite the file.
    ///
    /// Returns the new number of stored messages.
    pub async fn append(&self, payload: Value) -> Result<usize, StorageError> {
        let depth = nesting_depth(&payload);
        if depth > MAX_MESSAGE_DEPTH {
            return Err(StorageError::TooDeep { depth });
        }

        let _guard = match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let mut messages = self.load().await?;
        messages.push(payload);
        self.persist(&messages).await?;

        Ok(messages.len())
    }

    /// Overwrite the file with `messages`.
    pub async fn persist(&self, messages: &[Value]) -> Result<(), StorageError> {
        let encoded = encode(messages)?;
        tokio::fs::write(&self.path, encoded)
            .await
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

/// Number of nested arrays/objects in `value`; scalars are 0.
pub fn nesting_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(nesting_depth).max().unwrap_or(0),
        Value::Object(map) => 1 + map.values().map(nesting_depth).max().unwrap_or(0),
        _ => 0,
    }
}

/// Pretty-print with a four-space indent. Non-ASCII text is written as-is.
pub fn encode(messages: &[Value]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    messages.serialize(&mut ser)?;
    Ok(buf)
}
