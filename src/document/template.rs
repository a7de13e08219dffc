//! Insertion of the generated XML into a TEI template.

use super::Converted;
use crate::apparatus::Indent;
use crate::error::DocumentError;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// An insertion marker with whatever indentation precedes it on its line.
    static ref MARKER: Regex = Regex::new(r"[ \t]*#INSERT(BODY|WITNESSES|APP)#").unwrap();
}

const BODY_MARKER: &str = "#INSERTBODY#";

/// The template used when none is given.
pub const DEFAULT_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0" xml:lang="en">
    <teiHeader>
        <fileDesc>
            <titleStmt>
                <title/>
            </titleStmt>
            <publicationStmt>
                <p/>
            </publicationStmt>
            <sourceDesc>
                <listWit>
#INSERTWITNESSES#
                </listWit>
            </sourceDesc>
        </fileDesc>
    </teiHeader>
    <text>
        <body>
#INSERTBODY#
        </body>
    </text>
</TEI>
"#;

/// Fill `template` with a converted document.
///
/// `#INSERTBODY#` is replaced by the main text and is required.
/// `#INSERTWITNESSES#` gets one `<witness>` per witness code, indented with
/// `witness_indent`, and `#INSERTAPP#` the apparatus.
pub fn fill(
    template: &str,
    converted: &Converted,
    witness_indent: &Indent,
) -> Result<String, DocumentError> {
    if !template.contains(BODY_MARKER) {
        return Err(DocumentError::TemplateMarker(BODY_MARKER));
    }

    let filled = MARKER.replace_all(template, |caps: &Captures| match &caps[1] {
        "BODY" => converted.main.join("\n"),
        "APP" => converted.apparatus.join("\n"),
        _ => converted
            .witnesses
            .iter()
            .map(|w| witness_indent.line(&format!("<witness xml:id=\"{}\">{}</witness>", w, w)))
            .collect::<Vec<String>>()
            .join("\n"),
    });
    Ok(filled.into_owned())
}
