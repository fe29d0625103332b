use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted set of vital-sign measurements for a patient.
///
/// Written only by ingestion, immutable afterwards. Blood pressure is
/// stored pre-split into systolic / diastolic components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsRow {
    pub id: Uuid,
    pub patient_id: String,
    pub record_id: Option<Uuid>,
    pub heart_rate: Option<i64>,
    pub systolic_bp: Option<i64>,
    pub diastolic_bp: Option<i64>,
    pub blood_sugar: Option<f64>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

/// Measurement columns of a [`VitalsRow`], before ownership and time are attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsFragment {
    pub heart_rate: Option<i64>,
    pub systolic_bp: Option<i64>,
    pub diastolic_bp: Option<i64>,
    pub blood_sugar: Option<f64>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
}

impl VitalsFragment {
    pub fn into_row(
        self,
        patient_id: &str,
        record_id: Option<Uuid>,
        recorded_at: DateTime<Utc>,
    ) -> VitalsRow {
        VitalsRow {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            record_id,
            heart_rate: self.heart_rate,
            systolic_bp: self.systolic_bp,
            diastolic_bp: self.diastolic_bp,
            blood_sugar: self.blood_sugar,
            temperature: self.temperature,
            weight: self.weight,
            recorded_at,
        }
    }
}
