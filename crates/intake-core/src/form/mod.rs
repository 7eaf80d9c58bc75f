//! Intake form field extraction.

mod parser;
pub mod rules;

pub use parser::{IntakeFormParser, ParsedForm};
pub use rules::{Field, FieldRule, FieldValue, FIELD_RULES};

/// Turns sanitized document text into a structured record.
///
/// Parsing never fails: unrecoverable fields keep their defaults and are
/// listed in [`ParsedForm::missing_fields`].
pub trait FormParser {
    fn parse(&self, text: &str) -> ParsedForm;
}

impl<P: FormParser + ?Sized> FormParser for &P {
    fn parse(&self, text: &str) -> ParsedForm {
        (**self).parse(text)
    }
}
