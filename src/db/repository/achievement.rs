use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{conversion_error, format_timestamp, parse_date};
use crate::db::DatabaseError;
use crate::models::AchievementState;

/// Load a user's achievement row, if one has been created.
pub fn get_achievement(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<AchievementState>, DatabaseError> {
    conn.query_row(
        "SELECT user_id, points, streak, level, badges, last_action_date
         FROM achievements WHERE user_id = ?1",
        params![user_id],
        row_to_achievement,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Insert or overwrite a user's achievement row.
///
/// `created_at` is only written on first insert.
pub fn upsert_achievement(
    conn: &Connection,
    state: &AchievementState,
    now: &DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let badges = serde_json::to_string(&state.badges).map_err(|e| DatabaseError::CorruptColumn {
        column: "badges".into(),
        reason: e.to_string(),
    })?;
    let stamp = format_timestamp(now);
    conn.execute(
        "INSERT INTO achievements
             (user_id, points, streak, level, badges, last_action_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
         ON CONFLICT(user_id) DO UPDATE SET
             points = excluded.points,
             streak = excluded.streak,
             level = excluded.level,
             badges = excluded.badges,
             last_action_date = excluded.last_action_date,
             updated_at = excluded.updated_at",
        params![
            state.user_id,
            state.points,
            state.streak,
            state.level,
            badges,
            state.last_action_date.map(|d| d.format("%Y-%m-%d").to_string()),
            stamp,
        ],
    )?;
    Ok(())
}

fn row_to_achievement(row: &rusqlite::Row) -> Result<AchievementState, rusqlite::Error> {
    let badges_str: String = row.get(4)?;
    let date_str: Option<String> = row.get(5)?;

    Ok(AchievementState {
        user_id: row.get(0)?,
        points: row.get(1)?,
        streak: row.get(2)?,
        level: row.get(3)?,
        badges: serde_json::from_str(&badges_str).map_err(|e| conversion_error(4, e))?,
        last_action_date: date_str
            .map(|raw| parse_date("last_action_date", &raw))
            .transpose()
            .map_err(|e| conversion_error(5, e))?,
    })
}
