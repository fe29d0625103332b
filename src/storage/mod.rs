//! Object storage for uploaded originals.
//!
//! Objects are addressed by an opaque key; the store hands back a public
//! URL that is recorded on the `StoredRecord`. Writes are not transactional
//! with the datastore, so an object can outlive a failed record insert.

pub mod local;
pub mod memory;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Storage collaborator used by ingestion.
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` under `key` and return the stored location.
    ///
    /// Never overwrites: an existing `key` yields `StorageError::AlreadyExists`.
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError>;

    /// Public URL for a previously stored key.
    fn get_public_url(&self, key: &str) -> String;

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;
}

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").unwrap());

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let clean = UNSAFE_CHARS.replace_all(name, "_").into_owned();
    if clean.is_empty() {
        "file".to_string()
    } else {
        clean
    }
}

/// `{owner_id}/{timestamp_millis}-{sanitized_filename}`.
pub fn object_key(owner_id: &str, file_name: &str, at: &DateTime<Utc>) -> String {
    format!(
        "{}/{}-{}",
        owner_id,
        at.timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

/// Fallback key used when [`object_key`] is already taken:
/// `{owner_id}/{timestamp_millis}-{random}-{sanitized_filename}`.
pub fn unique_object_key(owner_id: &str, file_name: &str, at: &DateTime<Utc>) -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}-{}-{}",
        owner_id,
        at.timestamp_millis(),
        &nonce[..12],
        sanitize_file_name(file_name)
    )
}

/// Reject keys that could escape the store root.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
