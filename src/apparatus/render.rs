//! TEI markup for classified footnotes.

use super::classify::{classify, EditorialReason, VariantKind, VariantRecord, WitnessReading};
use slog::error;

/// Indentation of generated XML: `depth` repetitions of `unit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indent {
    pub unit: String,
    pub depth: usize,
}

impl Default for Indent {
    fn default() -> Self {
        Indent {
            unit: "    ".to_string(),
            depth: 0,
        }
    }
}

impl Indent {
    pub fn new(unit: &str, depth: usize) -> Indent {
        Indent {
            unit: unit.to_string(),
            depth,
        }
    }

    /// The same unit, `levels` deeper.
    pub fn deeper(&self, levels: usize) -> Indent {
        Indent {
            unit: self.unit.clone(),
            depth: self.depth + levels,
        }
    }

    pub fn pad(&self) -> String {
        self.unit.repeat(self.depth)
    }

    /// `text` prefixed with this indentation.
    pub fn line(&self, text: &str) -> String {
        let mut line = self.pad();
        line.push_str(text);
        line
    }
}

/// Render the readings of a classified footnote, one XML element per line.
///
/// The `<app>` wrapper is left to the caller; see [`render_app`].
pub fn render(record: &VariantRecord, indent: &Indent) -> Vec<String> {
    let mut xml = Vec::new();

    if let Some(note) = &record.note {
        xml.push(indent.line(&format!("<note>{}</note>", note)));
    }

    let reason = match record.kind {
        VariantKind::Correxi => Some(EditorialReason::Correxi),
        VariantKind::Conieci => Some(EditorialReason::Conieci),
        VariantKind::Omission => record.editorial_reason,
        VariantKind::Addition | VariantKind::Standard => None,
    };
    if let Some(reason) = reason {
        choice(&mut xml, reason, &record.base_text, indent);
    }

    for reading in &record.witness_readings {
        if record.kind == VariantKind::Addition {
            addition(&mut xml, reading, indent);
        } else if reading.is_omitted {
            gap(&mut xml, &reading.witness, indent);
        } else {
            let text = reading
                .variant_text
                .as_deref()
                .unwrap_or(&record.base_text);
            xml.push(indent.line(&format!(
                "<rdg wit=\"#{}\">{}</rdg>",
                reading.witness, text
            )));
        }
    }

    xml
}

fn choice(xml: &mut Vec<String>, reason: EditorialReason, base: &str, indent: &Indent) {
    let corr = match reason {
        EditorialReason::Correxi => "<corr>",
        EditorialReason::Conieci => "<corr type=\"conjecture\">",
    };
    xml.push(indent.line("<rdg>"));
    xml.push(indent.deeper(1).line("<choice>"));
    xml.push(indent.deeper(2).line(&format!("{}{}</corr>", corr, base)));
    xml.push(indent.deeper(1).line("</choice>"));
    xml.push(indent.line("</rdg>"));
}

fn gap(xml: &mut Vec<String>, witness: &str, indent: &Indent) {
    xml.push(indent.line(&format!("<rdg wit=\"#{}\">", witness)));
    xml.push(indent.deeper(1).line("<gap reason=\"omission\"/>"));
    xml.push(indent.line("</rdg>"));
}

fn addition(xml: &mut Vec<String>, reading: &WitnessReading, indent: &Indent) {
    xml.push(indent.line(&format!("<rdg wit=\"#{}\">", reading.witness)));
    xml.push(indent.deeper(1).line(&format!(
        "<add reason=\"add_scribe\">{}</add>",
        reading.variant_text.as_deref().unwrap_or_default()
    )));
    xml.push(indent.line("</rdg>"));
}

/// Classify footnote `number` and render it inside its `<app>` element.
///
/// A footnote that cannot be classified is still rendered, as a `<note>`
/// holding its text, so the apparatus keeps one `<app>` per footnote.
pub fn render_app(number: usize, text: &str, indent: &Indent) -> Vec<String> {
    let mut xml = vec![indent.line(&format!(
        "<app from=\"#begin_fn{}\" to=\"#end_fn{}\">",
        number, number
    ))];

    let inner = indent.deeper(1);
    match classify(text) {
        Ok(record) => xml.extend(render(&record, &inner)),
        Err(e) => {
            error!(
                slog_scope::logger(),
                "Footnote *{}* cannot be classified: {}", number, e
            );
            error!(slog_scope::logger(), "Footnote *{}* kept as a note: {}", number, text);
            xml.push(inner.line(&format!("<note>{}</note>", text)));
        }
    }

    xml.push(indent.line("</app>"));
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(text: &str) -> Vec<String> {
        render(&classify(text).unwrap(), &Indent::new("  ", 0))
    }

    mod indent {
        use super::*;

        #[test]
        fn default_is_four_spaces() {
            let indent = Indent::default();
            assert_eq!(indent.deeper(2).line("<p>"), "        <p>");
        }

        #[test]
        fn custom_unit() {
            assert_eq!(Indent::new("\t", 3).pad(), "\t\t\t");
            assert_eq!(Indent::new("\t", 0).line("x"), "x");
        }
    }

    mod render {
        use super::*;

        #[test]
        fn omission() {
            assert_eq!(
                flat("ssss ] W1: om. W2"),
                vec![
                    "<rdg wit=\"#W1\">ssss</rdg>",
                    "<rdg wit=\"#W2\">",
                    "  <gap reason=\"omission\"/>",
                    "</rdg>",
                ]
            );
        }

        #[test]
        fn omission_with_conieci() {
            assert_eq!(
                flat("ssss ] conieci: tttt W1: om. W2"),
                vec![
                    "<rdg>",
                    "  <choice>",
                    "    <corr type=\"conjecture\">ssss</corr>",
                    "  </choice>",
                    "</rdg>",
                    "<rdg wit=\"#W1\">tttt</rdg>",
                    "<rdg wit=\"#W2\">",
                    "  <gap reason=\"omission\"/>",
                    "</rdg>",
                ]
            );
        }

        #[test]
        fn addition() {
            assert_eq!(
                flat("ssss ] add. tttt W1: uuuu W2"),
                vec![
                    "<rdg wit=\"#W1\">",
                    "  <add reason=\"add_scribe\">tttt</add>",
                    "</rdg>",
                    "<rdg wit=\"#W2\">",
                    "  <add reason=\"add_scribe\">uuuu</add>",
                    "</rdg>",
                ]
            );
        }

        #[test]
        fn correxi() {
            assert_eq!(
                flat("ssss ] correxi: tttt W1, W2"),
                vec![
                    "<rdg>",
                    "  <choice>",
                    "    <corr>ssss</corr>",
                    "  </choice>",
                    "</rdg>",
                    "<rdg wit=\"#W1\">tttt</rdg>",
                    "<rdg wit=\"#W2\">tttt</rdg>",
                ]
            );
        }

        #[test]
        fn conieci() {
            assert_eq!(
                flat("ssss ] conieci: tttt W1, W2"),
                vec![
                    "<rdg>",
                    "  <choice>",
                    "    <corr type=\"conjecture\">ssss</corr>",
                    "  </choice>",
                    "</rdg>",
                    "<rdg wit=\"#W1\">tttt</rdg>",
                    "<rdg wit=\"#W2\">tttt</rdg>",
                ]
            );
        }

        #[test]
        fn shared_addition() {
            assert_eq!(
                flat("ssss ] add. tttt W1, W2"),
                vec![
                    "<rdg wit=\"#W1\">",
                    "  <add reason=\"add_scribe\">tttt</add>",
                    "</rdg>",
                    "<rdg wit=\"#W2\">",
                    "  <add reason=\"add_scribe\">tttt</add>",
                    "</rdg>",
                ]
            );
        }

        #[test]
        fn standard_with_note() {
            assert_eq!(
                flat("ssss ] W1: tttt W2; sic"),
                vec![
                    "<note>sic</note>",
                    "<rdg wit=\"#W1\">ssss</rdg>",
                    "<rdg wit=\"#W2\">tttt</rdg>",
                ]
            );
        }

        #[test]
        fn respects_depth() {
            let lines = render(
                &classify("ssss ] W1: om. W2").unwrap(),
                &Indent::new("  ", 2),
            );
            assert_eq!(lines[0], "    <rdg wit=\"#W1\">ssss</rdg>");
            assert_eq!(lines[2], "      <gap reason=\"omission\"/>");
        }
    }

    mod render_app {
        use super::*;

        #[test]
        fn wraps_readings() {
            assert_eq!(
                render_app(7, "ssss ] W1: tttt W2", &Indent::new("  ", 0)),
                vec![
                    "<app from=\"#begin_fn7\" to=\"#end_fn7\">",
                    "  <rdg wit=\"#W1\">ssss</rdg>",
                    "  <rdg wit=\"#W2\">tttt</rdg>",
                    "</app>",
                ]
            );
        }

        #[test]
        fn unclassifiable_becomes_note() {
            assert_eq!(
                render_app(2, "no bracket here", &Indent::new("  ", 1)),
                vec![
                    "  <app from=\"#begin_fn2\" to=\"#end_fn2\">",
                    "    <note>no bracket here</note>",
                    "  </app>",
                ]
            );
        }
    }
}
