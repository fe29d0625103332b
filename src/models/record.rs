use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded document together with its extraction metadata.
///
/// Created once by the ingestion coordinator and never mutated afterwards.
/// `metadata.legality` always holds one of `Valid`, `Invalid`, `Unverified`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub storage_key: String,
    pub file_url: String,
    pub file_type: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl StoredRecord {
    /// Legality recorded in the metadata blob.
    pub fn legality(&self) -> Option<&str> {
        self.metadata.get("legality").and_then(|v| v.as_str())
    }
}
