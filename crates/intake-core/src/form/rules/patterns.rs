//! Anchored patterns for intake form fields.
//!
//! All patterns are case-insensitive and tolerate a missing colon or extra
//! whitespace between the label and its value.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Identity
    pub static ref PATIENT_NAME: Regex = Regex::new(
        r"(?i)Patient Name[:\s]+([\w\s]+?)\sDOB"
    ).unwrap();

    pub static ref DOB: Regex = Regex::new(
        r"(?i)DOB[:\s]+([\d\s/-]+)"
    ).unwrap();

    pub static ref VISIT_DATE: Regex = Regex::new(
        r"(?i)Date[:\s]+([\d\s/-]+)"
    ).unwrap();

    // Checkbox answers: group 1 is whatever follows YES on the same line
    pub static ref INJECTION: Regex = Regex::new(
        r"(?i)Injection[:\s]+YES([^\n]*)"
    ).unwrap();

    pub static ref EXERCISE_THERAPY: Regex = Regex::new(
        r"(?i)Exercise Therapy[:\s]+YES([^\n]*)"
    ).unwrap();

    // Symptom severities
    pub static ref PAIN: Regex = Regex::new(r"(?i)Pain[:\s]+(\d+)").unwrap();
    pub static ref NUMBNESS: Regex = Regex::new(r"(?i)Numbness[:\s]+(\d+)").unwrap();
    pub static ref TINGLING: Regex = Regex::new(r"(?i)Tingling[:\s]+(\d+)").unwrap();
    pub static ref BURNING: Regex = Regex::new(r"(?i)Burning[:\s]+(\d+)").unwrap();
    pub static ref TIGHTNESS: Regex = Regex::new(r"(?i)Tightness[:\s]+(\d+)").unwrap();

    // Vitals
    pub static ref BLOOD_PRESSURE: Regex = Regex::new(
        r"(?i)Blood Pressure[:\s]+(\d+/\d+)"
    ).unwrap();

    pub static ref HEART_RATE: Regex = Regex::new(r"(?i)HR[:\s]+(\d+)").unwrap();

    pub static ref WEIGHT: Regex = Regex::new(r"(?i)Weight[:\s]+(\d+)").unwrap();

    // Feet and optional inches on one line: "5 10", "5'10", "6"
    pub static ref HEIGHT: Regex = Regex::new(
        r"(?i)Height[:\s]+(\d+(?:[ \t']+\d+)?)"
    ).unwrap();

    pub static ref SPO2: Regex = Regex::new(r"(?i)SpO2[:\s]+(\d+)").unwrap();

    pub static ref TEMPERATURE: Regex = Regex::new(
        r"(?i)Temperature[:\s]+(\d+\.\d+)"
    ).unwrap();

    pub static ref BLOOD_GLUCOSE: Regex = Regex::new(
        r"(?i)Blood Glucose[:\s]+(\d+)"
    ).unwrap();

    pub static ref RESPIRATIONS: Regex = Regex::new(
        r"(?i)Respirations[:\s]+(\d+)"
    ).unwrap();
}
