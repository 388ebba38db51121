//! Durable string-keyed storage for the serialized cart.
//!
//! The cart store only needs `get` and `set` on one key; [`KeyValueStore`]
//! keeps the same shape as browser local storage so any backend with
//! string keys and string values fits.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored data could not be decoded.
    #[error("Corrupt data in {location}: {source}")]
    Corrupt {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable string-keyed storage surviving restarts.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` if the key is absent.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove a value. Succeeds even if the key was absent.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
