//! Post-OCR cleanup of raw engine output.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Anything that is neither printable ASCII nor ASCII layout whitespace.
    static ref OUTSIDE_CHARSET: Regex = Regex::new(r"[^\x20-\x7E\t\n\r\x0C]+").unwrap();

    /// Underline and table-border artifacts.
    static ref RULE_RUNS: Regex = Regex::new(r"[_-]+").unwrap();
}

/// Clean a page of raw OCR output.
///
/// Each maximal run of out-of-charset characters becomes one space, then
/// each maximal run of `_`/`-` becomes one space. Line breaks survive so the
/// field parser still sees the page layout.
pub fn sanitize_ocr_text(raw: &str) -> String {
    let text = OUTSIDE_CHARSET.replace_all(raw, " ");
    RULE_RUNS.replace_all(&text, " ").into_owned()
}
