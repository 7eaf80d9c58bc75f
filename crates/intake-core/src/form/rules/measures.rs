//! Numeric scores and vitals.
//!
//! Values are parsed from the capture group only, never from the surrounding
//! text.

use super::FieldValue;

/// Unsigned integer; a digit run that overflows `u32` is a miss.
pub fn integer(capture: &str) -> Option<FieldValue> {
    capture.trim().parse::<u32>().ok().map(FieldValue::Integer)
}

/// Decimal reading such as a temperature.
pub fn decimal(capture: &str) -> Option<FieldValue> {
    capture
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(FieldValue::Decimal)
}

/// Composite value kept verbatim, e.g. blood pressure `120/80`.
pub fn verbatim(capture: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(capture.to_string()))
}

/// Feet and inches joined with an apostrophe: `5 10` -> `5'10`, `6` -> `6`.
pub fn height(capture: &str) -> Option<FieldValue> {
    let parts: Vec<&str> = capture
        .split(|c: char| c == ' ' || c == '\t' || c == '\'')
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(FieldValue::Text(parts.join("'")))
    }
}
