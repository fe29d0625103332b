/// Instruction sent with every document image. The field list mirrors
/// [`ExtractedRecord`](super::ExtractedRecord) exactly.
pub const EXTRACTION_PROMPT: &str = "\
Analyze this medical record image. Extract the following fields and return them as a valid JSON object.

- patient_name (string)
- age (string, e.g. \"34 years\")
- blood_group (string)
- disease (string, diagnosis or main complaint)
- legality (string, \"Valid\" if it looks like a real medical document with doctor signature/letterhead, else \"Invalid\")
- vitals (object):
    - heart_rate (integer, bpm)
    - blood_pressure (string, e.g. \"120/80\")
    - sugar_level (number, mg/dL)
    - temperature (number, Celsius)
    - weight (number, kg)

Use null for any value that is not present in the document.
Do not include markdown formatting. Just return the raw JSON string.";
