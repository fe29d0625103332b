//! Last-resort extraction used when every inference backend failed.
//!
//! Scans the upload (when it is text) and its file name for common vitals
//! notations. The result is never trusted: legality is always `Unverified`.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{ExtractedRecord, VitalsReading};
use crate::models::Legality;
use crate::pipeline::import::is_likely_text;

/// Extraction source recorded when the heuristic produced the record.
pub const LOCAL_HEURISTIC_SOURCE: &str = "local_heuristic";

/// Only the head of large text uploads is scanned.
const MAX_SCAN_BYTES: usize = 64 * 1024;

static BLOOD_PRESSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bp|blood\s*pressure)\s*[:=]?\s*(\d{2,3})\s*/\s*(\d{2,3})\b").unwrap()
});
static HEART_RATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:heart\s*rate|pulse|hr)\s*[:=]?\s*(\d{2,3})\b").unwrap()
});
static SUGAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:blood\s*sugar|sugar(?:\s*level)?|glucose)\s*[:=]?\s*(\d{2,3}(?:\.\d+)?)")
        .unwrap()
});
static TEMPERATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:temperature|temp)\s*[:=]?\s*(\d{2,3}(?:\.\d+)?)").unwrap()
});
static WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:weight|wt)\s*[:=]?\s*(\d{1,3}(?:\.\d+)?)").unwrap()
});
static BLOOD_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bblood\s*(?:group|type)\s*[:=]?\s*(AB|A|B|O)\s*(\+|-|positive|negative|pos|neg)")
        .unwrap()
});

/// Build a best-effort record from the raw upload.
pub fn heuristic_extract(bytes: &[u8], file_name: &str) -> ExtractedRecord {
    let mut haystack = file_name.replace(['_', '-'], " ");
    let head = &bytes[..bytes.len().min(MAX_SCAN_BYTES)];
    if is_likely_text(head) {
        haystack.push('\n');
        haystack.push_str(&String::from_utf8_lossy(head));
    }

    let vitals = scan_vitals(&haystack);
    let blood_group = scan_blood_group(&haystack);

    tracing::debug!(
        found_vitals = !vitals.is_empty(),
        found_blood_group = blood_group.is_some(),
        "Local heuristic extraction"
    );

    let mut record = ExtractedRecord {
        legality: Legality::Unverified,
        vitals: (!vitals.is_empty()).then_some(vitals),
        ..ExtractedRecord::default()
    };
    if let Some(group) = blood_group {
        record.blood_group = group;
    }
    record
}

fn scan_vitals(text: &str) -> VitalsReading {
    VitalsReading {
        heart_rate: capture(&HEART_RATE, text).and_then(|s| s.parse().ok()),
        blood_pressure: BLOOD_PRESSURE
            .captures(text)
            .map(|c| format!("{}/{}", &c[1], &c[2])),
        sugar_level: capture(&SUGAR, text).and_then(|s| s.parse().ok()),
        temperature: capture(&TEMPERATURE, text).and_then(|s| s.parse().ok()),
        weight: capture(&WEIGHT, text).and_then(|s| s.parse().ok()),
    }
}

fn scan_blood_group(text: &str) -> Option<String> {
    let caps = BLOOD_GROUP.captures(text)?;
    let sign = match caps[2].to_ascii_lowercase().as_str() {
        "+" | "pos" | "positive" => "+",
        _ => "-",
    };
    Some(format!("{}{}", caps[1].to_ascii_uppercase(), sign))
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
