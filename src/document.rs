//! Conversion of a whole transcription.
//!
//! A transcription holds an optional title and introduction, numbered
//! aphorisms each followed by commentary lines, and the footnote section.
//! [`convert`] renders the main text and the apparatus of a transcription.
//! The title, the introduction and each aphorism unit are rendered on their
//! own: one that fails is left out and reported, and the rest go on.

pub mod aphorisms;
pub mod divide;
pub mod template;

pub use aphorisms::{aphorisms, Aphorism};
pub use divide::{divide, Parts};
pub use template::{fill, DEFAULT_TEMPLATE};

use crate::apparatus::{
    classify, resolve_witnesses, skip_footnotes, FootnoteIssue, FootnoteTable, Indent, Splicer,
};
use crate::error::{DocumentError, UnitError};
use crate::settings::XmlSettings;
use slog::{debug, error, o, warn};
use std::collections::BTreeSet;
use std::fmt;

/// What [`convert`] needs besides the text.
#[derive(Debug, Clone)]
pub struct ConvertOptions<'a> {
    pub settings: &'a XmlSettings,
    /// Goes into the title section, `<div n="D" type="Title_section">`.
    pub doc_num: usize,
}

/// A part of the document left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    /// `introduction`, `title` or `aphorism N`.
    pub unit: String,
    pub error: UnitError,
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to process the {}: {}", self.unit, self.error)
    }
}

/// A converted document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Converted {
    pub main: Vec<String>,
    pub apparatus: Vec<String>,
    /// Every witness code cited, sorted.
    pub witnesses: Vec<String>,
    pub failures: Vec<UnitFailure>,
    /// Problems found in the footnote section. None of them stop the
    /// conversion.
    pub issues: Vec<FootnoteIssue>,
    /// Aphorism units that made it into the output.
    pub rendered_units: usize,
}

/// The markup of one unit, kept apart until the whole unit has rendered.
struct UnitXml {
    main: Vec<String>,
    apparatus: Vec<String>,
    witnesses: Vec<String>,
    cursor: usize,
}

impl UnitXml {
    fn starting_at(cursor: usize) -> UnitXml {
        UnitXml {
            main: Vec::new(),
            apparatus: Vec::new(),
            witnesses: Vec::new(),
            cursor,
        }
    }

    fn tag(&mut self, indent: &Indent, tag: &str) {
        self.main.push(indent.line(tag));
    }

    fn text(&mut self, splicer: &Splicer, line: &str) -> Result<(), UnitError> {
        // A footnote on the first word needs a space before it.
        let (resolved, references) = resolve_witnesses(&format!(" {}", line))?;
        let spliced = splicer.splice(&resolved, self.cursor)?;
        self.main.extend(spliced.main);
        self.apparatus.extend(spliced.apparatus);
        self.cursor = spliced.next_footnote;
        self.witnesses
            .extend(references.into_iter().map(|r| r.witness));
        Ok(())
    }
}

struct Converter<'a> {
    splicer: Splicer<'a>,
    body: Indent,
    cursor: usize,
    witnesses: BTreeSet<String>,
    converted: Converted,
}

impl<'a> Converter<'a> {
    /// Add a rendered unit to the document, or record its failure and move the
    /// cursor past its footnotes.
    fn commit<'l, I>(&mut self, unit: &str, raw: I, result: Result<UnitXml, UnitError>) -> bool
    where
        I: IntoIterator<Item = &'l str>,
    {
        match result {
            Ok(xml) => {
                self.converted.main.extend(xml.main);
                self.converted.apparatus.extend(xml.apparatus);
                self.witnesses.extend(xml.witnesses);
                self.cursor = xml.cursor;
                debug!(slog_scope::logger(), "Processed the {}", unit);
                true
            }
            Err(e) => {
                error!(slog_scope::logger(), "Unable to process the {}: {}", unit, e);
                self.cursor = raw
                    .into_iter()
                    .fold(self.cursor, |cursor, line| skip_footnotes(line, cursor));
                self.converted.failures.push(UnitFailure {
                    unit: unit.to_string(),
                    error: e,
                });
                false
            }
        }
    }

    /// `<div type="intro"><p>`
    fn introduction(&self, lines: &[&str]) -> Result<UnitXml, UnitError> {
        let b = &self.body;
        let text = self.splicer.nested(b.deeper(2));
        let mut xml = UnitXml::starting_at(self.cursor);
        xml.tag(b, "<div type=\"intro\">");
        xml.tag(&b.deeper(1), "<p>");
        for line in lines {
            xml.text(&text, line)?;
        }
        xml.tag(&b.deeper(1), "</p>");
        xml.tag(b, "</div>");
        Ok(xml)
    }

    /// `<div n="D" type="Title_section"><ab>`
    fn title(&self, lines: &[&str], doc_num: usize) -> Result<UnitXml, UnitError> {
        let b = &self.body;
        let text = self.splicer.nested(b.deeper(2));
        let mut xml = UnitXml::starting_at(self.cursor);
        xml.tag(b, &format!("<div n=\"{}\" type=\"Title_section\">", doc_num));
        xml.tag(&b.deeper(1), "<ab>");
        for line in lines {
            xml.text(&text, line)?;
        }
        xml.tag(&b.deeper(1), "</ab>");
        xml.tag(b, "</div>");
        Ok(xml)
    }

    /// `<div n="k" type="aphorism_commentary_unit">` with one aphorism block
    /// and a commentary block per commentary line.
    fn unit(&self, aphorism: &Aphorism) -> Result<UnitXml, UnitError> {
        let b = &self.body;
        let text = self.splicer.nested(b.deeper(3));
        let mut xml = UnitXml::starting_at(self.cursor);
        xml.tag(
            b,
            &format!(
                "<div n=\"{}\" type=\"aphorism_commentary_unit\">",
                aphorism.number
            ),
        );

        xml.tag(&b.deeper(1), "<div type=\"aphorism\">");
        xml.tag(&b.deeper(2), "<p>");
        xml.text(&text, &aphorism.text)?;
        xml.tag(&b.deeper(2), "</p>");
        xml.tag(&b.deeper(1), "</div>");

        for (i, commentary) in aphorism.commentaries.iter().enumerate() {
            if !commentary.ends_with('.') {
                debug!(
                    slog_scope::logger(),
                    "Commentary {} of aphorism {} does not end with \".\"",
                    i + 1,
                    aphorism.number
                );
            }
            xml.tag(&b.deeper(1), "<div type=\"commentary\">");
            xml.tag(&b.deeper(2), "<p>");
            xml.text(&text, commentary)?;
            xml.tag(&b.deeper(2), "</p>");
            xml.tag(&b.deeper(1), "</div>");
        }

        xml.tag(b, "</div>");
        Ok(xml)
    }
}

fn non_empty_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.trim().is_empty()).collect()
}

/// Convert a transcription into main text and apparatus.
///
/// Errors are returned only when the document as a whole cannot be trusted:
/// it cannot be divided, its aphorisms or footnotes are misnumbered, or
/// footnotes are left over once every unit has been processed.
pub fn convert(text: &str, options: &ConvertOptions) -> Result<Converted, DocumentError> {
    let parts = slog_scope::scope(&slog_scope::logger().new(o!("fn" => "divide()")), || {
        divide(text)
    })?;

    let table = if parts.footnotes.is_empty() {
        FootnoteTable::default()
    } else {
        FootnoteTable::from_text(&parts.footnotes)?
    };
    let issues = table.verify();
    for issue in &issues {
        warn!(slog_scope::logger(), "{}", issue);
    }

    let units = slog_scope::scope(&slog_scope::logger().new(o!("fn" => "aphorisms()")), || {
        aphorisms(&parts.body)
    })?;

    let mut witnesses = BTreeSet::new();
    for footnote in table.iter() {
        if let Ok(record) = classify(&footnote.text) {
            witnesses.extend(record.witnesses().map(str::to_string));
        }
    }

    let body = options.settings.body_indent();
    let mut converter = Converter {
        splicer: Splicer::new(&table, body.clone(), options.settings.apparatus_indent()),
        body,
        cursor: 1,
        witnesses,
        converted: Converted {
            issues,
            ..Default::default()
        },
    };

    if let Some(introduction) = &parts.introduction {
        let lines = non_empty_lines(introduction);
        let result = converter.introduction(&lines);
        converter.commit("introduction", lines, result);
    }

    let lines = non_empty_lines(&parts.title);
    let result = converter.title(&lines, options.doc_num);
    converter.commit("title", lines, result);

    for aphorism in &units {
        let result = converter.unit(aphorism);
        if converter.commit(&format!("aphorism {}", aphorism.number), aphorism.lines(), result) {
            converter.converted.rendered_units += 1;
        }
    }

    if converter.cursor != table.len() + 1 {
        return Err(DocumentError::UnusedFootnotes {
            found: table.len(),
            flagged: converter.cursor - 1,
        });
    }

    let mut converted = converter.converted;
    converted.witnesses = converter.witnesses.into_iter().collect();
    debug!(
        slog_scope::logger(),
        "Converted {} of {} aphorisms",
        converted.rendered_units,
        units.len()
    );
    Ok(converted)
}

/// The document number at the end of a file stem, `name_N`. Defaults to 1.
pub fn document_number(stem: &str) -> usize {
    match stem.rsplit_once('_').and_then(|(_, n)| n.parse().ok()) {
        Some(n) => n,
        None => {
            debug!(
                slog_scope::logger(),
                "No document number in {}, using 1", stem
            );
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReferenceError, SpliceError};

    fn run(text: &str) -> Result<Converted, DocumentError> {
        let settings = XmlSettings {
            indent_unit: " ".to_string(),
            body_depth: 0,
            apparatus_depth: 0,
            witness_depth: 0,
        };
        convert(
            text,
            &ConvertOptions {
                settings: &settings,
                doc_num: 2,
            },
        )
    }

    mod convert {
        use super::*;

        #[test]
        fn small_document() {
            let text = "\
Intro [A 1r]
++
1.
Life is short*1*
the art long.

*1*short ] A: brevis B.
";
            let converted = run(text).unwrap();
            assert_eq!(
                converted.main,
                vec![
                    "<div type=\"intro\">",
                    " <p>",
                    "  Intro",
                    "  <locus target=\"A\">1r</locus>",
                    " </p>",
                    "</div>",
                    "<div n=\"2\" type=\"Title_section\">",
                    " <ab>",
                    " </ab>",
                    "</div>",
                    "<div n=\"1\" type=\"aphorism_commentary_unit\">",
                    " <div type=\"aphorism\">",
                    "  <p>",
                    "   Life is",
                    "   <app n=\"1\" type=\"footnote\" xml:id=\"begin_fn1\"><rdg>short</rdg><anchor xml:id=\"end_fn1\"/>",
                    "   </app>",
                    "  </p>",
                    " </div>",
                    " <div type=\"commentary\">",
                    "  <p>",
                    "   the art long.",
                    "  </p>",
                    " </div>",
                    "</div>",
                ]
            );
            assert_eq!(
                converted.apparatus,
                vec![
                    "<app from=\"#begin_fn1\" to=\"#end_fn1\">",
                    " <rdg wit=\"#A\">short</rdg>",
                    " <rdg wit=\"#B\">brevis</rdg>",
                    "</app>",
                ]
            );
            assert_eq!(converted.witnesses, vec!["A", "B"]);
            assert_eq!(converted.rendered_units, 1);
            assert!(converted.failures.is_empty());
            assert!(converted.issues.is_empty());
        }

        #[test]
        fn footnote_on_first_word_of_commentary() {
            let text = "T\n1.\nAph\nshort*1* rest.\n*1*short ] A: brevis B.";
            let converted = run(text).unwrap();
            assert!(converted
                .main
                .iter()
                .any(|l| l.contains("<rdg>short</rdg>")));
        }

        #[test]
        fn footnote_on_first_word_of_any_line() {
            let text = "\
Intro*1* text
++
Title*2*
1.
Life*3* is short
*1*Intro ] A: Prooemium B.
*2*Title ] A: Titulus B.
*3*Life ] A: Vita B.
";
            let converted = run(text).unwrap();
            assert!(converted.failures.is_empty());
            for word in ["Intro", "Title", "Life"] {
                let rdg = format!("<rdg>{}</rdg>", word);
                assert!(converted.main.iter().any(|l| l.contains(&rdg)));
            }
            assert_eq!(converted.rendered_units, 1);
        }

        #[test]
        fn failing_unit_is_skipped() {
            let mut text = String::from("Title\n");
            let mut footnotes = String::new();
            for n in 1..=10 {
                if n == 4 {
                    // Nothing between the "#" and the marker.
                    text.push_str(&format!("{}.\nbroken #*{}* text\n", n, n));
                } else {
                    text.push_str(&format!("{}.\naphorism word*{}*\n", n, n));
                }
                footnotes.push_str(&format!("*{}*word ] A: verbum B.\n", n));
            }
            text.push_str(&footnotes);

            let converted = run(&text).unwrap();
            assert_eq!(converted.rendered_units, 9);
            assert_eq!(
                converted.failures,
                vec![UnitFailure {
                    unit: "aphorism 4".to_string(),
                    error: UnitError::Splice(SpliceError::NoBoundary { number: 4 }),
                }]
            );
            assert!(converted.main.iter().any(|l| l.contains("begin_fn5")));
            assert!(!converted.main.iter().any(|l| l.contains("begin_fn4")));
            assert_eq!(
                converted
                    .apparatus
                    .iter()
                    .filter(|l| l.starts_with("<app "))
                    .count(),
                9
            );
        }

        #[test]
        fn bad_reference_in_title() {
            let text = "Title [A1r]\n1.\nAph";
            let converted = run(text).unwrap();
            assert_eq!(converted.failures.len(), 1);
            assert_eq!(converted.failures[0].unit, "title");
            assert_eq!(
                converted.failures[0].error,
                UnitError::Reference(ReferenceError::MissingSeparator("A1r".to_string()))
            );
            assert_eq!(converted.rendered_units, 1);
        }

        #[test]
        fn unused_footnotes() {
            let text = "T\n1.\nAph word*1*\n*1*a ] A: b B.\n*2*c ] A: d B.";
            assert_eq!(
                run(text),
                Err(DocumentError::UnusedFootnotes {
                    found: 2,
                    flagged: 1
                })
            );
        }

        #[test]
        fn footnote_issues_are_reported() {
            let text = "T\n1.\nAph word*1*\n*1*a ] A: b B";
            let converted = run(text).unwrap();
            assert_eq!(converted.issues.len(), 1);
            assert_eq!(converted.issues[0].number, 1);
        }

        #[test]
        fn table_errors_are_fatal() {
            let text = "T\n1.\nAph word*1* and*2*\n*1*a ] A: b B.\n*3*c ] A: d B.";
            assert!(matches!(
                run(text),
                Err(DocumentError::FootnoteTable(_))
            ));
        }
    }

    mod document_number {
        use super::*;

        #[test]
        fn from_stem() {
            assert_eq!(document_number("aphorisms_12"), 12);
            assert_eq!(document_number("a_b_3"), 3);
            assert_eq!(document_number("aphorisms"), 1);
            assert_eq!(document_number("aphorisms_x"), 1);
        }
    }
}
