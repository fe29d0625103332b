//! Summary statistics over a patient's most recent vitals.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::repository::get_recent_vitals;
use crate::db::DatabaseError;
use crate::models::{AveragingPolicy, VitalsRow};

/// Rows considered when the caller gives no limit.
pub const DEFAULT_ANALYTICS_LIMIT: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VitalsSummary {
    pub average_heart_rate: i64,
    /// `"{systolic}/{diastolic}"`, `"0/0"` when there is no data.
    pub average_blood_pressure: String,
    pub record_count: usize,
}

/// Rows plus their summary, as returned to the analytics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientAnalytics {
    pub vitals: Vec<VitalsRow>,
    pub summary: VitalsSummary,
}

/// Summarize the `limit` most recent vitals rows of a patient.
pub fn summarize(
    conn: &Connection,
    patient_id: &str,
    limit: usize,
    policy: AveragingPolicy,
) -> Result<VitalsSummary, DatabaseError> {
    let rows = get_recent_vitals(conn, patient_id, limit)?;
    Ok(summarize_rows(&rows, policy))
}

pub fn patient_analytics(
    conn: &Connection,
    patient_id: &str,
    limit: usize,
    policy: AveragingPolicy,
) -> Result<PatientAnalytics, DatabaseError> {
    let vitals = get_recent_vitals(conn, patient_id, limit)?;
    let summary = summarize_rows(&vitals, policy);
    tracing::debug!(
        patient_id = %patient_id,
        record_count = summary.record_count,
        "Computed vitals analytics"
    );
    Ok(PatientAnalytics { vitals, summary })
}

/// Averages rounded half away from zero.
///
/// `NullAsZero` counts a missing value as 0 and divides by the row count;
/// `ExcludeMissing` divides by the number of rows that have the value.
pub fn summarize_rows(rows: &[VitalsRow], policy: AveragingPolicy) -> VitalsSummary {
    let heart = average(rows.iter().map(|r| r.heart_rate), rows.len(), policy);
    let systolic = average(rows.iter().map(|r| r.systolic_bp), rows.len(), policy);
    let diastolic = average(rows.iter().map(|r| r.diastolic_bp), rows.len(), policy);

    VitalsSummary {
        average_heart_rate: heart,
        average_blood_pressure: format!("{systolic}/{diastolic}"),
        record_count: rows.len(),
    }
}

fn average(values: impl Iterator<Item = Option<i64>>, rows: usize, policy: AveragingPolicy) -> i64 {
    let (sum, present) = values
        .flatten()
        .fold((0i64, 0usize), |(sum, n), v| (sum.saturating_add(v), n + 1));
    let denominator = match policy {
        AveragingPolicy::NullAsZero => rows,
        AveragingPolicy::ExcludeMissing => present,
    };
    if denominator == 0 {
        return 0;
    }
    (sum as f64 / denominator as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_vitals;
    use crate::db::sqlite::open_memory_database;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn row(heart_rate: Option<i64>, bp: Option<(i64, i64)>) -> VitalsRow {
        VitalsRow {
            id: Uuid::new_v4(),
            patient_id: "p1".into(),
            record_id: None,
            heart_rate,
            systolic_bp: bp.map(|b| b.0),
            diastolic_bp: bp.map(|b| b.1),
            blood_sugar: None,
            temperature: None,
            weight: None,
            recorded_at: Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_input_is_zeroed() {
        let summary = summarize_rows(&[], AveragingPolicy::NullAsZero);
        assert_eq!(
            summary,
            VitalsSummary {
                average_heart_rate: 0,
                average_blood_pressure: "0/0".into(),
                record_count: 0,
            }
        );
        assert_eq!(summarize_rows(&[], AveragingPolicy::ExcludeMissing).record_count, 0);
    }

    #[test]
    fn averages_heart_rate() {
        let rows = [row(Some(70), None), row(Some(90), None)];
        let summary = summarize_rows(&rows, AveragingPolicy::NullAsZero);
        assert_eq!(summary.average_heart_rate, 80);
        assert_eq!(summary.record_count, 2);
    }

    #[test]
    fn averages_pressure_components() {
        let rows = [row(None, Some((120, 80))), row(None, Some((131, 85)))];
        let summary = summarize_rows(&rows, AveragingPolicy::NullAsZero);
        // 125.5 and 82.5 round away from zero
        assert_eq!(summary.average_blood_pressure, "126/83");
    }

    #[test]
    fn missing_values_count_as_zero_by_default() {
        let rows = [row(Some(80), Some((120, 80))), row(None, None)];
        let summary = summarize_rows(&rows, AveragingPolicy::NullAsZero);
        assert_eq!(summary.average_heart_rate, 40);
        assert_eq!(summary.average_blood_pressure, "60/40");
    }

    #[test]
    fn exclude_missing_policy_ignores_nulls() {
        let rows = [row(Some(80), Some((120, 80))), row(None, None)];
        let summary = summarize_rows(&rows, AveragingPolicy::ExcludeMissing);
        assert_eq!(summary.average_heart_rate, 80);
        assert_eq!(summary.average_blood_pressure, "120/80");
        assert_eq!(summary.record_count, 2);
    }

    #[test]
    fn all_missing_under_exclude_policy_is_zero() {
        let rows = [row(None, None)];
        let summary = summarize_rows(&rows, AveragingPolicy::ExcludeMissing);
        assert_eq!(summary.average_heart_rate, 0);
        assert_eq!(summary.average_blood_pressure, "0/0");
    }

    #[test]
    fn summarize_uses_most_recent_rows_only() {
        let conn = open_memory_database().unwrap();
        let base = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
        for (i, hr) in [200, 60, 70, 80].into_iter().enumerate() {
            let mut r = row(Some(hr), None);
            r.recorded_at = base + Duration::hours(i as i64);
            insert_vitals(&conn, &r).unwrap();
        }

        let summary = summarize(&conn, "p1", 3, AveragingPolicy::NullAsZero).unwrap();
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.average_heart_rate, 70);
    }

    #[test]
    fn unknown_patient_summarizes_to_zero() {
        let conn = open_memory_database().unwrap();
        let summary = summarize(&conn, "ghost", DEFAULT_ANALYTICS_LIMIT, AveragingPolicy::NullAsZero)
            .unwrap();
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.average_blood_pressure, "0/0");
    }

    #[test]
    fn patient_analytics_returns_rows_oldest_first() {
        let conn = open_memory_database().unwrap();
        let base = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
        for (i, hr) in [70, 90].into_iter().enumerate() {
            let mut r = row(Some(hr), Some((110, 70)));
            r.recorded_at = base + Duration::days(i as i64);
            insert_vitals(&conn, &r).unwrap();
        }

        let analytics =
            patient_analytics(&conn, "p1", DEFAULT_ANALYTICS_LIMIT, AveragingPolicy::NullAsZero)
                .unwrap();
        let rates: Vec<i64> = analytics.vitals.iter().filter_map(|r| r.heart_rate).collect();
        assert_eq!(rates, vec![70, 90]);
        assert_eq!(analytics.summary.average_heart_rate, 80);
        assert_eq!(analytics.summary.average_blood_pressure, "110/70");
    }
}
