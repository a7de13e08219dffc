//! Error types for the apparatus engine and the document layer.
//!
//! Reference and splice errors abandon one line (and the caller skips the
//! unit it belongs to). Table errors abandon the whole document, because the
//! footnote numbering cannot be recovered. Classification errors never leave
//! the renderer: it logs them and falls back to a `<note>`.

use serde::Serialize;
use thiserror::Error;

/// A malformed `[WITNESS LOCATION]` reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// A `[` with no `]` after it.
    #[error("unable to find the closing \"]\" for the reference starting at {0:?}")]
    Unclosed(String),

    /// The reference body has no space between witness and location.
    #[error("unable to split reference [{0}] into witness and location (missing space?)")]
    MissingSeparator(String),

    /// The reference body starts with the separating space.
    #[error("reference [{0}] has no witness code")]
    EmptyWitness(String),
}

/// A footnote section that cannot be turned into a table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FootnoteTableError {
    #[error("the footnote section is empty")]
    Empty,

    /// The last footnote's number does not agree with the number of entries.
    #[error("number of footnotes {count} not in agreement with their numeration (last footnote is {last})")]
    CountMismatch { count: usize, last: String },

    /// An entry that does not start with a `*n*` marker.
    #[error("footnote {position} is not of the form *n*text: {line:?}")]
    MalformedEntry { position: usize, line: String },

    /// An entry numbered out of sequence.
    #[error("expected footnote {expected}, found footnote {found}")]
    OutOfOrder { expected: usize, found: usize },
}

/// A footnote whose text does not fit any of the variant grammars.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ClassificationError {
    /// Exactly one `]` must separate the base reading from the clause.
    #[error("expected exactly one \"]\", found {0}")]
    BaseDelimiter(usize),

    #[error("nothing follows the \"]\"")]
    EmptyClause,

    #[error("missing the {0:?} connective")]
    MissingConnective(&'static str),

    #[error("a reading has no witness")]
    MissingWitness,

    /// A comma-separated item with whitespace in it, which may be part of a
    /// reading rather than a witness code.
    #[error("cannot tell witness codes from reading text in {0:?}")]
    AmbiguousWitnessList(String),

    #[error("a standard variant needs exactly two witnesses separated by one \":\": {0:?}")]
    StandardShape(String),

    #[error("the second reading of a standard variant is empty")]
    EmptyReading,
}

/// A footnote marker in running text that cannot be spliced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpliceError {
    /// Neither a `#` nor a space precedes the marker.
    #[error("unable to find the word(s) flagged by footnote *{number}* (missing a space or \"#\"?)")]
    NoBoundary { number: usize },

    #[error("footnote *{number}* is flagged in the text but absent from the footnote section")]
    MissingFootnote { number: usize },
}

/// A title, introduction or aphorism that cannot be rendered. The unit is
/// left out of the output and the rest of the document goes on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Splice(#[from] SpliceError),
}

/// A document that cannot be converted at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("the document is empty")]
    Empty,

    /// Only one `*1*` in the whole text: either the marker or the section is
    /// missing.
    #[error("footnote referenced in the text but no footnote section present")]
    NoFootnoteSection,

    #[error("aphorisms should be numbered \"1.\" or \"1\" on a line of their own")]
    MissingFirstAphorism,

    #[error("aphorism numbering is broken (missing: {missing:?}, duplicated: {duplicated:?})")]
    AphorismNumbering {
        missing: Vec<usize>,
        duplicated: Vec<usize>,
    },

    /// Aphorisms numbered `1..=N` but not in that order.
    #[error("aphorism {found} found where aphorism {expected} was expected")]
    AphorismOrder { expected: usize, found: usize },

    /// More than two `++` lines.
    #[error("expected at most two \"++\" separators, found {0}")]
    Separators(usize),

    #[error(transparent)]
    FootnoteTable(#[from] FootnoteTableError),

    /// Footnotes left over (or missing) once every unit was processed.
    #[error("{found} footnote(s) in the footnote section but the text flags up to *{flagged}*")]
    UnusedFootnotes { found: usize, flagged: usize },

    #[error("unable to find template marker {0} in the template")]
    TemplateMarker(&'static str),
}
