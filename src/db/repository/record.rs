use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{conversion_error, format_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::StoredRecord;

const RECORD_COLUMNS: &str =
    "id, owner_id, title, storage_key, file_url, file_type, metadata, created_at";

pub fn insert_record(conn: &Connection, record: &StoredRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO records (id, owner_id, title, storage_key, file_url, file_type, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id.to_string(),
            record.owner_id,
            record.title,
            record.storage_key,
            record.file_url,
            record.file_type,
            record.metadata.to_string(),
            format_timestamp(&record.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_record(conn: &Connection, id: &Uuid) -> Result<Option<StoredRecord>, DatabaseError> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1");
    conn.query_row(&sql, params![id.to_string()], row_to_record)
        .optional()
        .map_err(DatabaseError::from)
}

/// Records owned by `owner_id`, newest first.
pub fn list_records_for_owner(
    conn: &Connection,
    owner_id: &str,
) -> Result<Vec<StoredRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM records
         WHERE owner_id = ?1
         ORDER BY created_at DESC, rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![owner_id], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn row_to_record(row: &rusqlite::Row) -> Result<StoredRecord, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let metadata_str: String = row.get(6)?;
    let created_str: String = row.get(7)?;

    Ok(StoredRecord {
        id: Uuid::parse_str(&id_str).map_err(|e| conversion_error(0, e))?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        storage_key: row.get(3)?,
        file_url: row.get(4)?,
        file_type: row.get(5)?,
        metadata: serde_json::from_str(&metadata_str).map_err(|e| conversion_error(6, e))?,
        created_at: parse_timestamp("created_at", &created_str)
            .map_err(|e| conversion_error(7, e))?,
    })
}
