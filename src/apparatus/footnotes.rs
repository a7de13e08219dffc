//! The footnote section of a transcription.
//!
//! Footnotes are written one per line, `*n*text.`, numbered from 1 without
//! gaps. The table is built once per document and only read afterwards.

use super::classify::{
    classify, misplaced_reason, stray_standard_text, variant_kind, EditorialReason, VariantKind,
};
use crate::error::{ClassificationError, FootnoteTableError};
use serde::Serialize;
use slog::{debug, warn};
use std::fmt;
use thiserror::Error;

/// One entry of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    pub number: usize,
    /// The line as written in the footnote section.
    pub line: String,
    /// The line without its marker, surrounding whitespace and periods.
    pub text: String,
}

/// Footnotes `1..=N`, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteTable {
    entries: Vec<Footnote>,
}

/// Split `*n*rest` into `n` and `rest`.
fn split_marker(line: &str) -> Option<(usize, &str)> {
    let (number, rest) = line.strip_prefix('*')?.split_once('*')?;
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok().map(|n| (n, rest))
}

impl FootnoteTable {
    /// Build the table from the footnote section, one footnote per line.
    pub fn from_text(section: &str) -> Result<FootnoteTable, FootnoteTableError> {
        FootnoteTable::from_lines(section.lines())
    }

    /// Build the table from footnote lines. Blank lines are skipped.
    pub fn from_lines<I, S>(lines: I) -> Result<FootnoteTable, FootnoteTableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        let last = match lines.last() {
            Some(l) => l,
            None => return Err(FootnoteTableError::Empty),
        };

        // The last footnote's number must agree with the number of footnotes.
        let count = lines.len();
        if split_marker(last).map(|(n, _)| n) != Some(count) {
            return Err(FootnoteTableError::CountMismatch {
                count,
                last: last.to_string(),
            });
        }

        let mut entries = Vec::with_capacity(count);
        for (i, line) in lines.iter().enumerate() {
            let position = i + 1;
            let (number, rest) =
                split_marker(line).ok_or_else(|| FootnoteTableError::MalformedEntry {
                    position,
                    line: line.to_string(),
                })?;

            if number != position {
                return Err(FootnoteTableError::OutOfOrder {
                    expected: position,
                    found: number,
                });
            }

            if line.matches('*').count() > 2 {
                warn!(slog_scope::logger(), "Problem in footnote: {}", line);
                warn!(
                    slog_scope::logger(),
                    "There is a footnote reference inside footnote {}; it will be kept as text",
                    number
                );
            }

            entries.push(Footnote {
                number,
                line: line.to_string(),
                text: rest
                    .trim_matches(|c: char| c == '.' || c.is_whitespace())
                    .to_string(),
            });
        }

        debug!(slog_scope::logger(), "Footnote table built ({} footnotes)", count);
        Ok(FootnoteTable { entries })
    }

    /// The footnote numbered `number` (counting from 1).
    pub fn get(&self, number: usize) -> Option<&Footnote> {
        number.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// The stored text of footnote `number`.
    pub fn text(&self, number: usize) -> Option<&str> {
        self.get(number).map(|f| f.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Footnote> {
        self.entries.iter()
    }

    /// Check every footnote against the transcription conventions.
    ///
    /// Nothing here stops a conversion: each problem is reported against its
    /// footnote and the caller decides what to do with it.
    pub fn verify(&self) -> Vec<FootnoteIssue> {
        let mut issues = Vec::new();
        for (i, footnote) in self.entries.iter().enumerate() {
            for problem in check_footnote(i + 1, footnote) {
                issues.push(FootnoteIssue {
                    number: footnote.number,
                    problem,
                });
            }
        }
        issues
    }
}

/// A convention a footnote breaks.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FootnoteProblem {
    #[error("expected two \"*\", found {0}")]
    MarkerCount(usize),

    #[error("does not start with \"*\"")]
    MissingLeadingMarker,

    #[error("does not end with \".\"")]
    MissingFinalPeriod,

    #[error("numbered out of sequence")]
    NumberMismatch,

    #[error("expected one \"]\", found {0}")]
    BracketCount(usize),

    #[error("contains \"codd\"")]
    ContainsCodd,

    #[error("\";\" may only introduce a single note after the apparatus")]
    UnscopedSemicolon,

    #[error("missing {0:?} after \"]\"")]
    MissingConnective(&'static str),

    #[error("{0:?} before the first witness is dropped")]
    StrayText(String),

    #[error("{0}")]
    Unclassifiable(ClassificationError),
}

/// A problem found in one footnote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FootnoteIssue {
    pub number: usize,
    pub problem: FootnoteProblem,
}

impl fmt::Display for FootnoteIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "footnote {}: {}", self.number, self.problem)
    }
}

fn check_footnote(position: usize, footnote: &Footnote) -> Vec<FootnoteProblem> {
    let mut problems = Vec::new();
    let line = footnote.line.as_str();
    let text = footnote.text.as_str();

    let stars = line.matches('*').count();
    if stars != 2 {
        problems.push(FootnoteProblem::MarkerCount(stars));
    }
    if !line.starts_with('*') {
        problems.push(FootnoteProblem::MissingLeadingMarker);
    }
    if !line.ends_with('.') {
        problems.push(FootnoteProblem::MissingFinalPeriod);
    }
    if split_marker(line).map(|(n, _)| n) != Some(position) {
        problems.push(FootnoteProblem::NumberMismatch);
    }
    if text.contains("codd") {
        problems.push(FootnoteProblem::ContainsCodd);
    }

    let semicolons = text.matches(';').count();
    let unscoped = match (text.find(';'), text.find(']')) {
        (Some(semicolon), Some(bracket)) => semicolon < bracket,
        (Some(_), None) => true,
        (None, _) => false,
    };
    if semicolons > 1 || unscoped {
        problems.push(FootnoteProblem::UnscopedSemicolon);
    }

    let brackets = text.matches(']').count();
    if brackets != 1 {
        problems.push(FootnoteProblem::BracketCount(brackets));
    } else if let Some((_, clause)) = text.split_once(']') {
        if let Some(connective) = missing_connective(text, clause) {
            problems.push(FootnoteProblem::MissingConnective(connective));
        }
        if variant_kind(text) == VariantKind::Standard {
            if let Some(stray) = stray_standard_text(without_note(clause)) {
                problems.push(FootnoteProblem::StrayText(stray));
            }
        }
    }

    if let Err(e) = classify(text) {
        problems.push(FootnoteProblem::Unclassifiable(e));
    }

    problems
}

fn without_note(clause: &str) -> &str {
    clause.rsplit_once(';').map_or(clause, |(variant, _)| variant)
}

/// The connective the clause after `]` should carry, if it is missing.
fn missing_connective(text: &str, clause: &str) -> Option<&'static str> {
    let expected = match variant_kind(text) {
        VariantKind::Addition => " add. ",
        VariantKind::Correxi => " correxi: ",
        VariantKind::Conieci => " conieci: ",
        VariantKind::Omission => {
            let head = clause.trim_start();
            if head.starts_with("correxi:") {
                " correxi: "
            } else if head.starts_with("conieci:") {
                " conieci: "
            } else if let Some(reason) = misplaced_reason(without_note(head)) {
                return Some(match reason {
                    EditorialReason::Correxi => " correxi: ",
                    EditorialReason::Conieci => " conieci: ",
                });
            } else {
                return (!clause.contains(" om. ")).then_some(" om. ");
            }
        }
        VariantKind::Standard => return None,
    };
    (!clause.starts_with(expected)).then_some(expected)
}
