//! Patient identity and visit date values.

use super::FieldValue;

/// Trimmed capture as text; an all-whitespace capture counts as a miss.
pub fn trimmed_text(capture: &str) -> Option<FieldValue> {
    let value = capture.trim();
    if value.is_empty() {
        None
    } else {
        Some(FieldValue::Text(value.to_string()))
    }
}
