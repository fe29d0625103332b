use super::types::ExtractedRecord;
use super::ExtractionError;

/// Strictly decode sanitized backend text into an [`ExtractedRecord`].
///
/// Unknown fields are ignored and missing ones take their defaults, but a
/// malformed document or a wrongly typed field rejects the whole record.
pub fn parse(cleaned: &str) -> Result<ExtractedRecord, ExtractionError> {
    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(|e| ExtractionError::Parse(e.to_string()))?;
    // Derived struct decoding also accepts positional arrays; only objects are records.
    if !value.is_object() {
        return Err(ExtractionError::Parse("expected a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| ExtractionError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Legality;
    use crate::pipeline::extraction::sanitize;

    #[test]
    fn parses_full_record() {
        let json = r#"{
            "patient_name": "Amara Okafor",
            "age": "34 years",
            "blood_group": "O+",
            "disease": "Hypertension",
            "legality": "Valid",
            "vitals": {
                "heart_rate": 78,
                "blood_pressure": "140/90",
                "sugar_level": 110.5,
                "temperature": 36.8,
                "weight": 64
            }
        }"#;
        let record = parse(json).unwrap();
        assert_eq!(record.patient_name, "Amara Okafor");
        assert_eq!(record.legality, Legality::Valid);
        let vitals = record.vitals.unwrap();
        assert_eq!(vitals.heart_rate, Some(78));
        assert_eq!(vitals.blood_pressure.as_deref(), Some("140/90"));
        assert_eq!(vitals.weight, Some(64.0));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let record = parse(r#"{"disease": "Flu"}"#).unwrap();
        assert_eq!(record.disease, "Flu");
        assert_eq!(record.patient_name, "Unknown");
        assert_eq!(record.age, "Unknown");
        assert_eq!(record.legality, Legality::Unverified);
        assert!(record.vitals.is_none());
    }

    #[test]
    fn null_strings_take_defaults() {
        let record = parse(r#"{"patient_name": null, "vitals": null, "legality": null}"#).unwrap();
        assert_eq!(record.patient_name, "Unknown");
        assert_eq!(record.legality, Legality::Unverified);
        assert!(record.vitals.is_none());
    }

    #[test]
    fn unknown_fields_ignored() {
        let record = parse(r#"{"patient_name": "A", "hospital": "General"}"#).unwrap();
        assert_eq!(record.patient_name, "A");
    }

    #[test]
    fn legality_case_insensitive() {
        assert_eq!(parse(r#"{"legality": "invalid"}"#).unwrap().legality, Legality::Invalid);
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(parse("{not json"), Err(ExtractionError::Parse(_))));
        assert!(matches!(parse(""), Err(ExtractionError::Parse(_))));
        assert!(matches!(parse("[1, 2]"), Err(ExtractionError::Parse(_))));
        assert!(matches!(
            parse(r#"["A", "30", "O+", "Flu"]"#),
            Err(ExtractionError::Parse(_))
        ));
    }

    #[test]
    fn wrong_types_rejected_not_partially_accepted() {
        assert!(parse(r#"{"patient_name": 42}"#).is_err());
        assert!(parse(r#"{"vitals": {"heart_rate": "fast"}}"#).is_err());
        assert!(parse(r#"{"vitals": {"heart_rate": 72.5}}"#).is_err());
        assert!(parse(r#"{"legality": "Maybe"}"#).is_err());
        assert!(parse(r#"{"vitals": "none"}"#).is_err());
    }

    #[test]
    fn fenced_response_parses_after_sanitize() {
        let raw = "```json\n{\"blood_group\": \"AB-\"}\n```";
        let record = parse(&sanitize(raw)).unwrap();
        assert_eq!(record.blood_group, "AB-");
    }
}
