//! Rule-driven intake form parser.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::record::PatientRecord;

use super::rules::{Field, FieldRule, FieldValue, FIELD_RULES};
use super::FormParser;

/// Result of parsing one document's text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedForm {
    /// The fully shaped record.
    pub record: PatientRecord,
    /// Fields left at their default, in record order.
    pub missing_fields: Vec<Field>,
    /// Parse time in milliseconds.
    pub processing_time_ms: u64,
}

impl ParsedForm {
    /// Number of fields recovered from the text.
    pub fn recovered_count(&self) -> usize {
        Field::ALL.len() - self.missing_fields.len()
    }
}

/// Parser that resolves every field independently from a rule table.
pub struct IntakeFormParser {
    rules: &'static [FieldRule],
}

impl IntakeFormParser {
    /// Create a parser over the built-in rule table.
    pub fn new() -> Self {
        Self {
            rules: FIELD_RULES.as_slice(),
        }
    }

    /// Rules applied by this parser, in record order.
    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }
}

impl Default for IntakeFormParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FormParser for IntakeFormParser {
    fn parse(&self, text: &str) -> ParsedForm {
        let start = Instant::now();
        let mut record = PatientRecord::default();
        let mut missing_fields = Vec::new();

        for rule in self.rules {
            let assigned = rule
                .apply(text)
                .is_some_and(|value| assign(&mut record, rule.field, value));
            if !assigned {
                missing_fields.push(rule.field);
            }
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Parsed intake form: {}/{} fields recovered in {}ms",
            self.rules.len() - missing_fields.len(),
            self.rules.len(),
            processing_time_ms
        );
        if !missing_fields.is_empty() {
            let names: Vec<&str> = missing_fields.iter().map(|f| f.key()).collect();
            debug!("Fields left at default: {}", names.join(", "));
        }
        if let Ok(pretty) = record.to_json_pretty() {
            debug!("Parsed record:\n{}", pretty);
        }

        ParsedForm {
            record,
            missing_fields,
            processing_time_ms,
        }
    }
}

/// Store `value` in the record slot for `field`.
///
/// Returns `false` when the value type does not fit the field, which leaves
/// the default in place.
fn assign(record: &mut PatientRecord, field: Field, value: FieldValue) -> bool {
    let symptoms = &mut record.pain_symptoms;
    let vitals = &mut record.medical_assistant_data;

    match (field, value) {
        (Field::PatientName, FieldValue::Text(v)) => record.patient_name = v,
        (Field::Dob, FieldValue::Text(v)) => record.dob = v,
        (Field::Date, FieldValue::Text(v)) => record.date = v,
        (Field::Injection, FieldValue::Flag(v)) => record.injection = v,
        (Field::ExerciseTherapy, FieldValue::Flag(v)) => record.exercise_therapy = v,
        (Field::Pain, FieldValue::Integer(v)) => symptoms.pain = Some(v),
        (Field::Numbness, FieldValue::Integer(v)) => symptoms.numbness = Some(v),
        (Field::Tingling, FieldValue::Integer(v)) => symptoms.tingling = Some(v),
        (Field::Burning, FieldValue::Integer(v)) => symptoms.burning = Some(v),
        (Field::Tightness, FieldValue::Integer(v)) => symptoms.tightness = Some(v),
        (Field::BloodPressure, FieldValue::Text(v)) => vitals.blood_pressure = Some(v),
        (Field::HeartRate, FieldValue::Integer(v)) => vitals.hr = Some(v),
        (Field::Weight, FieldValue::Integer(v)) => vitals.weight = Some(v),
        (Field::Height, FieldValue::Text(v)) => vitals.height = Some(v),
        (Field::Spo2, FieldValue::Integer(v)) => vitals.spo2 = Some(v),
        (Field::Temperature, FieldValue::Decimal(v)) => vitals.temperature = Some(v),
        (Field::BloodGlucose, FieldValue::Integer(v)) => vitals.blood_glucose = Some(v),
        (Field::Respirations, FieldValue::Integer(v)) => vitals.respirations = Some(v),
        (field, value) => {
            debug!("Ignoring {:?} for field {}", value, field);
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{PainSymptoms, VitalSigns, YesNo, UNKNOWN};
    use crate::ocr::sanitize_ocr_text;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(text: &str) -> ParsedForm {
        IntakeFormParser::new().parse(text)
    }

    const FULL_FORM: &str = "\
Patient Name: Jane Smith DOB: 03/04/1990
Date: 05/06/2024
Injection: YES
Exercise Therapy: NO
Pain: 7 Numbness: 2 Tingling: 0 Burning: 5 Tightness: 1
Blood Pressure: 120/80 HR: 72 Weight: 180 Height: 5 10
SpO2: 98 Temperature: 98.6 Blood Glucose: 105 Respirations: 16
";

    #[test]
    fn test_no_labels_gives_default_record() {
        let parsed = parse("nothing useful was scanned here");

        assert_eq!(parsed.record, PatientRecord::default());
        assert_eq!(parsed.missing_fields, Field::ALL.to_vec());
        assert_eq!(parsed.recovered_count(), 0);

        let value = serde_json::to_value(&parsed.record).unwrap();
        assert_eq!(
            value,
            json!({
                "patient_name": "Unknown",
                "dob": "Unknown",
                "date": "Unknown",
                "injection": "No",
                "exercise_therapy": "No",
                "pain_symptoms": {
                    "pain": null, "numbness": null, "tingling": null,
                    "burning": null, "tightness": null
                },
                "medical_assistant_data": {
                    "blood_pressure": null, "hr": null, "weight": null,
                    "height": null, "spo2": null, "temperature": null,
                    "blood_glucose": null, "respirations": null
                }
            })
        );
    }

    #[test]
    fn test_empty_text() {
        let parsed = parse("");
        assert_eq!(parsed.record, PatientRecord::default());
    }

    #[test]
    fn test_full_form() {
        let parsed = parse(FULL_FORM);

        // "Exercise Therapy: NO" is not a YES, so that field stays at its default
        assert_eq!(parsed.missing_fields, vec![Field::ExerciseTherapy]);
        assert_eq!(
            parsed.record,
            PatientRecord {
                patient_name: "Jane Smith".to_string(),
                dob: "03/04/1990".to_string(),
                date: "05/06/2024".to_string(),
                injection: YesNo::Yes,
                exercise_therapy: YesNo::No,
                pain_symptoms: PainSymptoms {
                    pain: Some(7),
                    numbness: Some(2),
                    tingling: Some(0),
                    burning: Some(5),
                    tightness: Some(1),
                },
                medical_assistant_data: VitalSigns {
                    blood_pressure: Some("120/80".to_string()),
                    hr: Some(72),
                    weight: Some(180),
                    height: Some("5'10".to_string()),
                    spo2: Some(98),
                    temperature: Some(98.6),
                    blood_glucose: Some(105),
                    respirations: Some(16),
                },
            }
        );
    }

    #[test]
    fn test_explicit_no_stays_at_default() {
        let parsed = parse("Injection: YES\nExercise Therapy: NO");
        assert_eq!(parsed.record.injection, YesNo::Yes);
        assert_eq!(parsed.record.exercise_therapy, YesNo::No);
        assert!(parsed.missing_fields.contains(&Field::ExerciseTherapy));
    }

    #[test]
    fn test_partial_pain_symptoms() {
        let parsed = parse("Pain: 7");
        let value = serde_json::to_value(&parsed.record.pain_symptoms).unwrap();
        assert_eq!(
            value,
            json!({
                "pain": 7, "numbness": null, "tingling": null,
                "burning": null, "tightness": null
            })
        );
    }

    #[test]
    fn test_sanitized_name_and_dob() {
        let text = sanitize_ocr_text("Patient Name: Jo\u{99}hn___Doe DOB: 01/02/1980");
        assert_eq!(text, "Patient Name: Jo hn Doe DOB: 01/02/1980");

        let parsed = parse(&text);
        assert_eq!(parsed.record.patient_name, "Jo hn Doe");
        assert_eq!(parsed.record.dob, "01/02/1980");
    }

    #[test]
    fn test_whitespace_only_name_is_unknown() {
        // The name capture is only blanks, which is a miss.
        let parsed = parse("Patient Name:   \n  DOB 01/02/1980");
        assert_eq!(parsed.record.patient_name, UNKNOWN);
        assert_eq!(parsed.record.dob, "01/02/1980");
        assert!(parsed.missing_fields.contains(&Field::PatientName));
    }

    #[test]
    fn test_blank_dob_and_date_are_unknown() {
        let parsed = parse("DOB:  \nDate:  \nPain: 2");
        assert_eq!(parsed.record.dob, UNKNOWN);
        assert_eq!(parsed.record.date, UNKNOWN);
        assert_eq!(parsed.record.pain_symptoms.pain, Some(2));
        assert!(parsed.missing_fields.contains(&Field::Dob));
        assert!(parsed.missing_fields.contains(&Field::Date));
    }

    #[test]
    fn test_fields_spread_across_pages() {
        let text = "Patient Name: Jane Smith DOB: 03/04/1990\n\nPain: 3 HR: 72";
        let record = parse(text).record;

        assert_eq!(record.patient_name, "Jane Smith");
        assert_eq!(record.dob, "03/04/1990");
        assert_eq!(record.pain_symptoms.pain, Some(3));
        assert_eq!(record.medical_assistant_data.hr, Some(72));
    }

    #[test]
    fn test_overflowing_score_is_null() {
        let record = parse("Pain: 99999999999 Weight: 150").record;
        assert_eq!(record.pain_symptoms.pain, None);
        assert_eq!(record.medical_assistant_data.weight, Some(150));
    }

    #[test]
    fn test_assign_rejects_mismatched_value() {
        let mut record = PatientRecord::default();
        assert!(!assign(&mut record, Field::Pain, FieldValue::Text("x".into())));
        assert_eq!(record, PatientRecord::default());
    }

    #[test]
    fn test_rules_exposed() {
        assert_eq!(IntakeFormParser::new().rules().len(), Field::ALL.len());
    }
}
