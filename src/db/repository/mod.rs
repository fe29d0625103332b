//! Repository layer: entity-scoped database operations.
//!
//! Every function takes a borrowed `Connection`; callers own transaction
//! boundaries except where a function documents its own.

mod achievement;
mod record;
mod vitals;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use super::DatabaseError;

pub use achievement::*;
pub use record::*;
pub use vitals::*;

/// Timestamps are stored as RFC 3339 UTC with millisecond precision,
/// which sorts lexicographically in chronological order.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DatabaseError::CorruptColumn {
            column: column.into(),
            reason: e.to_string(),
        })
}

/// Wrap a column decoding failure so it can leave a `query_map` closure.
pub(crate) fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

pub(crate) fn parse_date(column: &str, raw: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| DatabaseError::CorruptColumn {
        column: column.into(),
        reason: e.to_string(),
    })
}
