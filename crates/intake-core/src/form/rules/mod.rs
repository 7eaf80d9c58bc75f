//! Rule table for intake form fields.
//!
//! Each field is resolved by exactly one rule: a pattern, the capture group
//! holding the value, and a transform that turns the capture into a typed
//! value. A rule that does not match, or whose transform rejects the capture,
//! leaves the field at its default.

pub mod flags;
pub mod identity;
pub mod measures;
pub mod patterns;

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::YesNo;

use patterns::*;

/// Every field of a [`PatientRecord`](crate::models::record::PatientRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PatientName,
    Dob,
    Date,
    Injection,
    ExerciseTherapy,
    Pain,
    Numbness,
    Tingling,
    Burning,
    Tightness,
    BloodPressure,
    HeartRate,
    Weight,
    Height,
    Spo2,
    Temperature,
    BloodGlucose,
    Respirations,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 18] = [
        Field::PatientName,
        Field::Dob,
        Field::Date,
        Field::Injection,
        Field::ExerciseTherapy,
        Field::Pain,
        Field::Numbness,
        Field::Tingling,
        Field::Burning,
        Field::Tightness,
        Field::BloodPressure,
        Field::HeartRate,
        Field::Weight,
        Field::Height,
        Field::Spo2,
        Field::Temperature,
        Field::BloodGlucose,
        Field::Respirations,
    ];

    /// JSON key of the field in the serialized record.
    pub fn key(&self) -> &'static str {
        match self {
            Field::PatientName => "patient_name",
            Field::Dob => "dob",
            Field::Date => "date",
            Field::Injection => "injection",
            Field::ExerciseTherapy => "exercise_therapy",
            Field::Pain => "pain",
            Field::Numbness => "numbness",
            Field::Tingling => "tingling",
            Field::Burning => "burning",
            Field::Tightness => "tightness",
            Field::BloodPressure => "blood_pressure",
            Field::HeartRate => "hr",
            Field::Weight => "weight",
            Field::Height => "height",
            Field::Spo2 => "spo2",
            Field::Temperature => "temperature",
            Field::BloodGlucose => "blood_glucose",
            Field::Respirations => "respirations",
        }
    }

    /// Label printed on the paper form.
    pub fn label(&self) -> &'static str {
        match self {
            Field::PatientName => "Patient Name",
            Field::Dob => "DOB",
            Field::Date => "Date",
            Field::Injection => "Injection",
            Field::ExerciseTherapy => "Exercise Therapy",
            Field::Pain => "Pain",
            Field::Numbness => "Numbness",
            Field::Tingling => "Tingling",
            Field::Burning => "Burning",
            Field::Tightness => "Tightness",
            Field::BloodPressure => "Blood Pressure",
            Field::HeartRate => "HR",
            Field::Weight => "Weight",
            Field::Height => "Height",
            Field::Spo2 => "SpO2",
            Field::Temperature => "Temperature",
            Field::BloodGlucose => "Blood Glucose",
            Field::Respirations => "Respirations",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Typed value produced by a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(u32),
    Decimal(f64),
    Flag(YesNo),
}

/// Extraction rule for a single field.
pub struct FieldRule {
    pub field: Field,
    pub pattern: &'static Regex,
    pub group: usize,
    pub transform: fn(&str) -> Option<FieldValue>,
}

impl FieldRule {
    /// Apply the rule to the full form text.
    ///
    /// Matches are tried in order; the first one the transform accepts wins.
    pub fn apply(&self, text: &str) -> Option<FieldValue> {
        self.pattern.captures_iter(text).find_map(|caps| {
            caps.get(self.group)
                .and_then(|capture| (self.transform)(capture.as_str()))
        })
    }

    /// The rule registered for `field`.
    pub fn for_field(field: Field) -> &'static FieldRule {
        // The table holds one rule per field, in `Field::ALL` order.
        let index = Field::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default();
        &FIELD_RULES[index]
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("field", &self.field)
            .field("pattern", &self.pattern.as_str())
            .field("group", &self.group)
            .finish()
    }
}

macro_rules! rule {
    ($field:expr, $pattern:expr, $transform:expr) => {
        FieldRule {
            field: $field,
            pattern: &$pattern,
            group: 1,
            transform: $transform,
        }
    };
}

lazy_static! {
    /// One rule per field, in record order.
    pub static ref FIELD_RULES: Vec<FieldRule> = vec![
        rule!(Field::PatientName, PATIENT_NAME, identity::trimmed_text),
        rule!(Field::Dob, DOB, identity::trimmed_text),
        rule!(Field::Date, VISIT_DATE, identity::trimmed_text),
        rule!(Field::Injection, INJECTION, flags::complete_yes),
        rule!(Field::ExerciseTherapy, EXERCISE_THERAPY, flags::complete_yes),
        rule!(Field::Pain, PAIN, measures::integer),
        rule!(Field::Numbness, NUMBNESS, measures::integer),
        rule!(Field::Tingling, TINGLING, measures::integer),
        rule!(Field::Burning, BURNING, measures::integer),
        rule!(Field::Tightness, TIGHTNESS, measures::integer),
        rule!(Field::BloodPressure, BLOOD_PRESSURE, measures::verbatim),
        rule!(Field::HeartRate, HEART_RATE, measures::integer),
        rule!(Field::Weight, WEIGHT, measures::integer),
        rule!(Field::Height, HEIGHT, measures::height),
        rule!(Field::Spo2, SPO2, measures::integer),
        rule!(Field::Temperature, TEMPERATURE, measures::decimal),
        rule!(Field::BloodGlucose, BLOOD_GLUCOSE, measures::integer),
        rule!(Field::Respirations, RESPIRATIONS, measures::integer),
    ];
}
