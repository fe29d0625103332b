use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Legality;

/// Placeholder used for every textual field the backend could not read.
pub const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// A string that decodes `null` as [`UNKNOWN`] but still rejects non-strings.
fn string_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown))
}

/// Clinical fields a backend extracts from one document.
///
/// This JSON shape is what backends are prompted to produce; field names
/// must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    #[serde(default = "unknown", deserialize_with = "string_or_unknown")]
    pub patient_name: String,
    /// Free text, e.g. "34 years".
    #[serde(default = "unknown", deserialize_with = "string_or_unknown")]
    pub age: String,
    #[serde(default = "unknown", deserialize_with = "string_or_unknown")]
    pub blood_group: String,
    #[serde(default = "unknown", deserialize_with = "string_or_unknown")]
    pub disease: String,
    #[serde(default)]
    pub legality: Legality,
    #[serde(default)]
    pub vitals: Option<VitalsReading>,
}

impl Default for ExtractedRecord {
    fn default() -> Self {
        Self {
            patient_name: unknown(),
            age: unknown(),
            blood_group: unknown(),
            disease: unknown(),
            legality: Legality::Unverified,
            vitals: None,
        }
    }
}

/// Raw vitals as reported by a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsReading {
    /// Beats per minute.
    #[serde(default)]
    pub heart_rate: Option<i64>,
    /// "systolic/diastolic", e.g. "120/80".
    #[serde(default)]
    pub blood_pressure: Option<String>,
    /// mg/dL.
    #[serde(default)]
    pub sugar_level: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// kg.
    #[serde(default)]
    pub weight: Option<f64>,
}

impl VitalsReading {
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none()
            && self.blood_pressure.is_none()
            && self.sugar_level.is_none()
            && self.temperature.is_none()
            && self.weight.is_none()
    }
}
