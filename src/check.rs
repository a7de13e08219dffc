//! Checking a footnote section without converting the document.

use crate::apparatus::{classify, FootnoteProblem, FootnoteTable, VariantRecord};
use crate::document::divide;
use crate::error::{ClassificationError, DocumentError};
use serde::Serialize;

/// A footnote as the converter would see it.
#[derive(Debug, Serialize)]
pub struct CheckedFootnote<'a> {
    pub number: usize,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<VariantRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ClassificationError>,
    pub problems: Vec<FootnoteProblem>,
}

/// The footnote section of `text`.
///
/// Text that starts with `*1*` is taken to be a footnote section already.
pub fn footnote_section(text: &str) -> Result<String, DocumentError> {
    let text = text.trim();
    if text.starts_with("*1*") {
        return Ok(text.to_string());
    }
    divide(text).map(|parts| parts.footnotes)
}

/// Classify and verify every footnote of `table`.
pub fn checked_footnotes(table: &FootnoteTable) -> Vec<CheckedFootnote<'_>> {
    let issues = table.verify();
    table
        .iter()
        .map(|footnote| {
            let (record, error) = match classify(&footnote.text) {
                Ok(r) => (Some(r), None),
                Err(e) => (None, Some(e)),
            };
            CheckedFootnote {
                number: footnote.number,
                text: &footnote.text,
                record,
                error,
                problems: issues
                    .iter()
                    .filter(|i| i.number == footnote.number)
                    .map(|i| i.problem.clone())
                    .collect(),
            }
        })
        .collect()
}
