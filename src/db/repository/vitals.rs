use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{conversion_error, format_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::VitalsRow;

const VITALS_COLUMNS: &str = "id, patient_id, record_id, heart_rate, systolic_bp, diastolic_bp,
     blood_sugar, temperature, weight, recorded_at";

/// Insert a vitals row.
pub fn insert_vitals(conn: &Connection, row: &VitalsRow) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO vitals (id, patient_id, record_id, heart_rate, systolic_bp, diastolic_bp,
         blood_sugar, temperature, weight, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            row.id.to_string(),
            row.patient_id,
            row.record_id.map(|id| id.to_string()),
            row.heart_rate,
            row.systolic_bp,
            row.diastolic_bp,
            row.blood_sugar,
            row.temperature,
            row.weight,
            format_timestamp(&row.recorded_at),
        ],
    )?;
    Ok(())
}

/// The `limit` most recent vitals rows for a patient, oldest first.
pub fn get_recent_vitals(
    conn: &Connection,
    patient_id: &str,
    limit: usize,
) -> Result<Vec<VitalsRow>, DatabaseError> {
    let sql = format!(
        "SELECT {VITALS_COLUMNS} FROM (
             SELECT rowid AS seq, {VITALS_COLUMNS}
             FROM vitals
             WHERE patient_id = ?1
             ORDER BY recorded_at DESC, seq DESC
             LIMIT ?2
         )
         ORDER BY recorded_at ASC, seq ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt.query_map(params![patient_id, limit], row_to_vitals)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Vitals rows extracted from one stored record.
pub fn get_vitals_for_record(
    conn: &Connection,
    record_id: &Uuid,
) -> Result<Vec<VitalsRow>, DatabaseError> {
    let sql = format!(
        "SELECT {VITALS_COLUMNS} FROM vitals WHERE record_id = ?1 ORDER BY recorded_at ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![record_id.to_string()], row_to_vitals)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn count_vitals(conn: &Connection, patient_id: &str) -> Result<u32, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM vitals WHERE patient_id = ?1",
        params![patient_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn row_to_vitals(row: &rusqlite::Row) -> Result<VitalsRow, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let record_str: Option<String> = row.get(2)?;
    let recorded_str: String = row.get(9)?;

    Ok(VitalsRow {
        id: Uuid::parse_str(&id_str).map_err(|e| conversion_error(0, e))?,
        patient_id: row.get(1)?,
        record_id: record_str
            .map(|s| Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| conversion_error(2, e))?,
        heart_rate: row.get(3)?,
        systolic_bp: row.get(4)?,
        diastolic_bp: row.get(5)?,
        blood_sugar: row.get(6)?,
        temperature: row.get(7)?,
        weight: row.get(8)?,
        recorded_at: parse_timestamp("recorded_at", &recorded_str)
            .map_err(|e| conversion_error(9, e))?,
    })
}
