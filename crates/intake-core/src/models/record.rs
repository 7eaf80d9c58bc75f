//! Patient intake record produced by the field parser.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default for free-text identity fields that could not be recovered.
pub const UNKNOWN: &str = "Unknown";

/// A complete intake record.
///
/// Every key is always present when serialized. Fields that could not be
/// recovered from the document hold their default (`"Unknown"`, `"No"` or
/// `null`), never a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Patient full name as printed on the form.
    pub patient_name: String,

    /// Date of birth, kept verbatim (not parsed into a calendar date).
    pub dob: String,

    /// Visit date, kept verbatim.
    pub date: String,

    /// Whether an injection was marked.
    pub injection: YesNo,

    /// Whether exercise therapy was marked.
    pub exercise_therapy: YesNo,

    /// Symptom severity scores.
    pub pain_symptoms: PainSymptoms,

    /// Vitals recorded by the medical assistant.
    pub medical_assistant_data: VitalSigns,
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            patient_name: UNKNOWN.to_string(),
            dob: UNKNOWN.to_string(),
            date: UNKNOWN.to_string(),
            injection: YesNo::No,
            exercise_therapy: YesNo::No,
            pain_symptoms: PainSymptoms::default(),
            medical_assistant_data: VitalSigns::default(),
        }
    }
}

impl PatientRecord {
    /// Serialize to the JSON document handed to storage.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON for diagnostics.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a record back from its JSON document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Strict two-valued answer for checkbox-style fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symptom severities. `None` means "not recorded", which is distinct from a
/// recorded score of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainSymptoms {
    pub pain: Option<u32>,
    pub numbness: Option<u32>,
    pub tingling: Option<u32>,
    pub burning: Option<u32>,
    pub tightness: Option<u32>,
}

impl PainSymptoms {
    /// Iterate `(name, score)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<u32>)> {
        [
            ("pain", self.pain),
            ("numbness", self.numbness),
            ("tingling", self.tingling),
            ("burning", self.burning),
            ("tightness", self.tightness),
        ]
        .into_iter()
    }
}

/// Vitals section of the intake form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Systolic/diastolic as written, e.g. `"120/80"`.
    pub blood_pressure: Option<String>,

    /// Heart rate.
    pub hr: Option<u32>,

    pub weight: Option<u32>,

    /// Feet and inches joined by an apostrophe, e.g. `"5'10"`.
    pub height: Option<String>,

    pub spo2: Option<u32>,

    pub temperature: Option<f64>,

    pub blood_glucose: Option<u32>,

    pub respirations: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_default_record_is_fully_shaped() {
        let value = serde_json::to_value(PatientRecord::default()).unwrap();

        assert_eq!(
            value,
            json!({
                "patient_name": "Unknown",
                "dob": "Unknown",
                "date": "Unknown",
                "injection": "No",
                "exercise_therapy": "No",
                "pain_symptoms": {
                    "pain": null,
                    "numbness": null,
                    "tingling": null,
                    "burning": null,
                    "tightness": null
                },
                "medical_assistant_data": {
                    "blood_pressure": null,
                    "hr": null,
                    "weight": null,
                    "height": null,
                    "spo2": null,
                    "temperature": null,
                    "blood_glucose": null,
                    "respirations": null
                }
            })
        );
    }

    #[test]
    fn test_key_order_is_stable() {
        let json = PatientRecord::default().to_json().unwrap();
        let name = json.find("patient_name").unwrap();
        let dob = json.find("\"dob\"").unwrap();
        let vitals = json.find("medical_assistant_data").unwrap();
        assert!(name < dob && dob < vitals);
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(YesNo::from(true), YesNo::Yes);
        assert_eq!(YesNo::default().to_string(), "No");
        assert_eq!(serde_json::to_string(&YesNo::Yes).unwrap(), "\"Yes\"");
    }

    #[test]
    fn test_symptom_iteration_order() {
        let symptoms = PainSymptoms {
            pain: Some(7),
            ..Default::default()
        };
        let names: Vec<_> = symptoms.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["pain", "numbness", "tingling", "burning", "tightness"]);
        assert_eq!(symptoms.iter().next(), Some(("pain", Some(7))));
    }
}
