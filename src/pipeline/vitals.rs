//! Splits a backend's vitals reading into storable columns.

use crate::models::VitalsFragment;
use crate::pipeline::extraction::VitalsReading;

/// Map a reading onto vitals columns, splitting `"sys/dia"` blood pressure.
///
/// An unparsable pressure leaves both components empty; this never fails.
pub fn decompose(reading: &VitalsReading) -> VitalsFragment {
    let (systolic_bp, diastolic_bp) = reading
        .blood_pressure
        .as_deref()
        .and_then(split_blood_pressure)
        .map_or((None, None), |(s, d)| (Some(s), Some(d)));

    VitalsFragment {
        heart_rate: reading.heart_rate,
        systolic_bp,
        diastolic_bp,
        blood_sugar: reading.sugar_level,
        temperature: reading.temperature,
        weight: reading.weight,
    }
}

/// Exactly one `/` between two unsigned integers; whitespace around each is allowed.
fn split_blood_pressure(raw: &str) -> Option<(i64, i64)> {
    let (sys, dia) = raw.split_once('/')?;
    Some((parse_component(sys)?, parse_component(dia)?))
}

fn parse_component(part: &str) -> Option<i64> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(bp: Option<&str>) -> VitalsReading {
        VitalsReading {
            heart_rate: Some(72),
            blood_pressure: bp.map(String::from),
            sugar_level: Some(98.0),
            temperature: Some(36.6),
            weight: Some(68.5),
        }
    }

    #[test]
    fn splits_well_formed_pressure() {
        let fragment = decompose(&reading(Some("120/80")));
        assert_eq!(fragment.systolic_bp, Some(120));
        assert_eq!(fragment.diastolic_bp, Some(80));
    }

    #[test]
    fn tolerates_whitespace() {
        let fragment = decompose(&reading(Some(" 135 / 85 ")));
        assert_eq!((fragment.systolic_bp, fragment.diastolic_bp), (Some(135), Some(85)));
    }

    #[test]
    fn malformed_pressure_yields_nulls() {
        for bp in ["120", "120/80/70", "high", "120/", "/80", "12a/80", "120 / eighty", "-120/80", ""] {
            let fragment = decompose(&reading(Some(bp)));
            assert_eq!(fragment.systolic_bp, None, "systolic for {bp:?}");
            assert_eq!(fragment.diastolic_bp, None, "diastolic for {bp:?}");
        }
    }

    #[test]
    fn other_fields_pass_through() {
        let fragment = decompose(&reading(None));
        assert_eq!(fragment.heart_rate, Some(72));
        assert_eq!(fragment.blood_sugar, Some(98.0));
        assert_eq!(fragment.temperature, Some(36.6));
        assert_eq!(fragment.weight, Some(68.5));
        assert_eq!(fragment.systolic_bp, None);
    }

    #[test]
    fn empty_reading_gives_empty_fragment() {
        assert_eq!(decompose(&VitalsReading::default()), VitalsFragment::default());
    }
}
