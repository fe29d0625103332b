//! Record upload and listing endpoints.
//!
//! `POST /api/records/upload` takes a multipart body with a `file` part and
//! an optional `type` part, then runs the ingestion coordinator on a
//! blocking thread. Inference calls may take tens of seconds per backend.

use axum::extract::{Multipart, Path, State};
use axum::Extension;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{run_blocking, ApiContext, CallerContext};
use crate::db::repository::{get_record, list_records_for_owner};
use crate::models::StoredRecord;
use crate::pipeline::import::{ValidationError, DEFAULT_DECLARED_TYPE};
use crate::pipeline::ingest::Upload;

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub record: StoredRecord,
}

#[derive(Serialize)]
pub struct RecordsResponse {
    pub records: Vec<StoredRecord>,
}

struct FilePart {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// `POST /api/records/upload`: store, extract and persist one document.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<FilePart> = None;
    let mut declared_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable file part: {e}")))?;
                file = Some(FilePart {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable type part: {e}")))?;
                declared_type = Some(text);
            }
            _ => {}
        }
    }

    let file = file.ok_or(ValidationError::MissingFile)?;
    let declared_type = declared_type.unwrap_or_else(|| DEFAULT_DECLARED_TYPE.to_string());

    let record = run_blocking(move || {
        let mut conn = ctx.open_db()?;
        ctx.coordinator
            .ingest(
                &mut conn,
                Upload {
                    owner_id: &caller.user_id,
                    bytes: &file.bytes,
                    file_name: &file.file_name,
                    declared_type: &declared_type,
                    mime_type: &file.content_type,
                },
            )
            .map_err(ApiError::from)
    })
    .await?;

    Ok(Json(UploadResponse {
        success: true,
        record,
    }))
}

/// `GET /api/records`: caller's records, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let records = run_blocking(move || {
        let conn = ctx.open_db()?;
        list_records_for_owner(&conn, &caller.user_id).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(RecordsResponse { records }))
}

/// `GET /api/records/:id`: one of the caller's records.
///
/// Records owned by someone else are reported as missing.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Result<Json<StoredRecord>, ApiError> {
    let record_id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid record ID format".into()))?;

    let record = run_blocking(move || {
        let conn = ctx.open_db()?;
        get_record(&conn, &record_id).map_err(ApiError::from)
    })
    .await?
    .filter(|r| r.owner_id == caller.user_id)
    .ok_or_else(|| ApiError::NotFound("Record not found".into()))?;

    Ok(Json(record))
}
