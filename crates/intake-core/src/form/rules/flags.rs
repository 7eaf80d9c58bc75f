//! Strict Yes/No checkbox answers.

use crate::models::record::YesNo;

use super::{Field, FieldValue};

/// Decide whether the `YES` matched by a checkbox pattern is the complete
/// answer, given the rest of its line.
///
/// Only a complete `YES` counts: nothing after it but blanks, a single
/// closing period, or the next field label. `YESTERDAY`, `YES please`,
/// `YES, please` and a printed `YES / NO` choice do not. A non-match leaves
/// the field at its `No` default.
pub fn complete_yes(rest_of_line: &str) -> Option<FieldValue> {
    let blank = |s: &str| s.trim_matches([' ', '\t', '\r']).is_empty();

    let affirmative = if blank(rest_of_line) {
        true
    } else if let Some(after_period) = rest_of_line.strip_prefix('.') {
        blank(after_period)
    } else if rest_of_line.starts_with([' ', '\t']) {
        starts_with_label(rest_of_line.trim_start_matches([' ', '\t']))
    } else {
        false
    };

    affirmative.then_some(FieldValue::Flag(YesNo::Yes))
}

/// Whether `text` begins with a known form label as a whole word.
fn starts_with_label(text: &str) -> bool {
    Field::ALL.iter().any(|field| {
        let label = field.label();
        let Some(head) = text.get(..label.len()) else {
            return false;
        };
        head.eq_ignore_ascii_case(label)
            && !text[label.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic())
    })
}
