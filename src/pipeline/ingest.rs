//! Upload ingestion: store → extract → decompose → persist → reward.
//!
//! Collaborators are injected as trait objects so the whole flow runs in
//! tests against an in-memory store and mock inference backends.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::achievements::apply_action;
use crate::db::repository::{insert_record, insert_vitals};
use crate::db::DatabaseError;
use crate::models::{Action, DailyRepeatPolicy, StoredRecord, VitalsRow};
use crate::pipeline::extraction::{
    heuristic_extract, ExtractedRecord, FallbackOrchestrator, EXTRACTION_PROMPT,
    LOCAL_HEURISTIC_SOURCE,
};
use crate::pipeline::import::{
    base_file_name, content_hash, validate_owner, validate_upload, ValidationError,
};
use crate::pipeline::vitals::decompose;
use crate::storage::{object_key, unique_object_key, ObjectStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage write failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for IngestError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(DatabaseError::from(e))
    }
}

/// One upload as received from the caller.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub owner_id: &'a str,
    pub bytes: &'a [u8],
    pub file_name: &'a str,
    pub declared_type: &'a str,
    pub mime_type: &'a str,
}

pub struct IngestionCoordinator {
    store: Arc<dyn ObjectStore>,
    orchestrator: Arc<FallbackOrchestrator>,
    max_upload_bytes: usize,
    daily_repeat_policy: DailyRepeatPolicy,
}

impl IngestionCoordinator {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        orchestrator: Arc<FallbackOrchestrator>,
        max_upload_bytes: usize,
        daily_repeat_policy: DailyRepeatPolicy,
    ) -> Self {
        Self {
            store,
            orchestrator,
            max_upload_bytes,
            daily_repeat_policy,
        }
    }

    pub fn ingest(&self, conn: &mut Connection, upload: Upload<'_>) -> Result<StoredRecord, IngestError> {
        self.ingest_at(conn, upload, Utc::now())
    }

    /// Ingest with an explicit clock reading (`now` stamps the key, the
    /// record and its vitals row).
    ///
    /// A storage failure aborts before the datastore is touched. A datastore
    /// failure after a successful store leaves the object orphaned. The
    /// "upload" reward is best-effort and never fails the ingestion.
    pub fn ingest_at(
        &self,
        conn: &mut Connection,
        upload: Upload<'_>,
        now: DateTime<Utc>,
    ) -> Result<StoredRecord, IngestError> {
        let owner_id = validate_owner(upload.owner_id)?;
        let validated = validate_upload(
            upload.bytes,
            upload.file_name,
            upload.declared_type,
            upload.mime_type,
            self.max_upload_bytes,
        )?;
        let file_name = base_file_name(upload.file_name);

        let _span = tracing::info_span!(
            "ingest",
            owner_id = %owner_id,
            size = validated.size,
            mime_type = %validated.mime_type,
        )
        .entered();

        // 1. Store the original
        let mut key = object_key(owner_id, &file_name, &now);
        let file_url = match self.store.put(&key, upload.bytes, &validated.mime_type) {
            Ok(url) => url,
            Err(StorageError::AlreadyExists(_)) => {
                tracing::warn!(key = %key, "Object key taken, storing under a unique key");
                key = unique_object_key(owner_id, &file_name, &now);
                self.store.put(&key, upload.bytes, &validated.mime_type)?
            }
            Err(e) => return Err(e.into()),
        };

        // 2. Extract, falling back to the local heuristic
        let attempt = self
            .orchestrator
            .extract(upload.bytes, &validated.mime_type, EXTRACTION_PROMPT);
        let (extracted, source) = match attempt {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, "Inference unavailable, using local heuristic");
                (
                    heuristic_extract(upload.bytes, &file_name),
                    LOCAL_HEURISTIC_SOURCE.to_string(),
                )
            }
        };

        // 3. Decompose vitals
        let record_id = Uuid::new_v4();
        let vitals_row: Option<VitalsRow> = extracted
            .vitals
            .as_ref()
            .map(|v| decompose(v).into_row(owner_id, Some(record_id), now));

        // 4. Merge extraction into metadata
        let metadata = build_metadata(
            &file_name,
            upload.bytes,
            &validated.mime_type,
            &source,
            &extracted,
        );

        let record = StoredRecord {
            id: record_id,
            owner_id: owner_id.to_string(),
            title: file_name.clone(),
            storage_key: key,
            file_url,
            file_type: validated.declared_type,
            metadata,
            created_at: now,
        };

        // 5. Persist record and vitals together
        let tx = conn.transaction()?;
        insert_record(&tx, &record)?;
        if let Some(row) = &vitals_row {
            insert_vitals(&tx, row)?;
        }
        tx.commit()?;

        tracing::info!(
            record_id = %record.id,
            source = %source,
            legality = extracted.legality.as_str(),
            has_vitals = vitals_row.is_some(),
            "Record ingested"
        );

        // 6. Reward the upload
        if let Err(e) = apply_action(
            conn,
            owner_id,
            Action::Upload,
            now.date_naive(),
            self.daily_repeat_policy,
        ) {
            tracing::warn!(error = %e, "Failed to apply upload achievement");
        }

        Ok(record)
    }
}

/// File bookkeeping plus every extracted field, flattened into one object.
fn build_metadata(
    file_name: &str,
    bytes: &[u8],
    mime_type: &str,
    source: &str,
    extracted: &ExtractedRecord,
) -> Value {
    let mut metadata = Map::new();
    metadata.insert("originalName".into(), json!(file_name));
    metadata.insert("size".into(), json!(bytes.len()));
    metadata.insert("mimeType".into(), json!(mime_type));
    metadata.insert("sha256".into(), json!(content_hash(bytes)));
    metadata.insert("extraction".into(), json!({ "source": source }));

    if let Ok(Value::Object(fields)) = serde_json::to_value(extracted) {
        metadata.extend(fields);
    }
    Value::Object(metadata)
}
