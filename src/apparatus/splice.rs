//! Footnote markers in running text.
//!
//! A marker `*n*` closes the span of text it annotates. Without help the span
//! is the word right before the marker; a `#` before the marker opens a longer
//! span, as in `aaa #bbb ccc*1*`. Footnotes are numbered across the whole
//! document, so the caller threads the number of the next expected footnote
//! through every line, in order.

use super::footnotes::FootnoteTable;
use super::render::{render_app, Indent};
use crate::error::SpliceError;
use slog::trace;

/// The markup produced for one line of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spliced {
    pub main: Vec<String>,
    pub apparatus: Vec<String>,
    /// The footnote the next line should start looking for.
    pub next_footnote: usize,
}

/// Splices footnotes from one document's table into its lines.
#[derive(Debug, Clone)]
pub struct Splicer<'a> {
    table: &'a FootnoteTable,
    main: Indent,
    apparatus: Indent,
}

impl<'a> Splicer<'a> {
    pub fn new(table: &'a FootnoteTable, main: Indent, apparatus: Indent) -> Splicer<'a> {
        Splicer {
            table,
            main,
            apparatus,
        }
    }

    /// A splicer for the same document writing main text at another indentation.
    pub fn nested(&self, main: Indent) -> Splicer<'a> {
        Splicer {
            table: self.table,
            main,
            apparatus: self.apparatus.clone(),
        }
    }

    /// Replace the footnote markers of `line`, starting with footnote `cursor`.
    ///
    /// Markers are matched strictly in sequence: once `*n*` is found, only
    /// `*n+1*` is looked for in the rest of the line. Any other marker is left
    /// in the text.
    pub fn splice(&self, line: &str, cursor: usize) -> Result<Spliced, SpliceError> {
        let mut spliced = Spliced {
            next_footnote: cursor,
            ..Default::default()
        };
        let mut rest = line;

        loop {
            let number = spliced.next_footnote;
            let symbol = format!("*{}*", number);
            let (before, after) = match rest.split_once(symbol.as_str()) {
                Some(parts) => parts,
                None => {
                    self.push_text(&mut spliced.main, rest);
                    break;
                }
            };

            let (unflagged, flagged) =
                flag_boundary(before).ok_or(SpliceError::NoBoundary { number })?;
            let text = self
                .table
                .text(number)
                .ok_or(SpliceError::MissingFootnote { number })?;
            trace!(slog_scope::logger(), "Footnote *{}* flags {:?}", number, flagged);

            self.push_text(&mut spliced.main, unflagged);
            let anchor = format!(
                "<app n=\"{n}\" type=\"footnote\" xml:id=\"begin_fn{n}\"><rdg>{}</rdg><anchor xml:id=\"end_fn{n}\"/>",
                flagged,
                n = number
            );
            for l in anchor.lines() {
                spliced.main.push(self.main.line(l));
            }
            spliced.main.push(self.main.line("</app>"));

            spliced
                .apparatus
                .extend(render_app(number, text, &self.apparatus));

            spliced.next_footnote += 1;
            rest = after;
            if rest.is_empty() {
                break;
            }
        }

        Ok(spliced)
    }

    /// Plain text, one trimmed line per source line. Blank lines are dropped.
    fn push_text(&self, main: &mut Vec<String>, text: &str) {
        main.extend(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|l| self.main.line(l)),
        );
    }
}

/// Split the text before a marker into unflagged text and the flagged span.
///
/// The span starts after the last `#`, or failing that after the last
/// whitespace (a reference puts its `<locus>` on a line of its own, so a line
/// break is a word boundary too). A `<locus>` right before the marker is
/// flagged whole.
fn flag_boundary(before: &str) -> Option<(&str, &str)> {
    let before = before.trim_end();
    let (unflagged, flagged) = match before.rsplit_once('#') {
        Some(parts) => parts,
        None => {
            let (unflagged, last) = before.rsplit_once('\n').unwrap_or(("", before));
            let last = last.trim();
            if last.starts_with("<locus ") && last.ends_with("</locus>") {
                (unflagged, last)
            } else {
                before.rsplit_once(char::is_whitespace)?
            }
        }
    };
    if flagged.trim().is_empty() {
        return None;
    }
    Some((unflagged, flagged))
}

/// The cursor after the footnote markers of `line`, without rendering them.
///
/// Used to keep the numbering in step when a line is abandoned.
pub fn skip_footnotes(line: &str, cursor: usize) -> usize {
    let mut rest = line;
    let mut next = cursor;
    while let Some((_, after)) = rest.split_once(format!("*{}*", next).as_str()) {
        next += 1;
        rest = after;
    }
    next
}
