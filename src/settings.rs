//! Layout settings for the generated XML, optionally read from a RON file.

use crate::apparatus::Indent;
use ron::de::from_str;
use serde::{Deserialize, Serialize};
use slog::debug;

/// How deep each kind of generated line sits, in units of `indent_unit`.
///
/// The defaults fit [`crate::document::DEFAULT_TEMPLATE`]: the body is
/// inserted inside `<TEI><text><body>` and the witness list inside
/// `<TEI><teiHeader><fileDesc><sourceDesc><listWit>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct XmlSettings {
    pub indent_unit: String,
    pub body_depth: usize,
    pub apparatus_depth: usize,
    pub witness_depth: usize,
}

impl Default for XmlSettings {
    fn default() -> Self {
        XmlSettings {
            indent_unit: "    ".to_string(),
            body_depth: 3,
            apparatus_depth: 0,
            witness_depth: 5,
        }
    }
}

impl XmlSettings {
    pub fn body_indent(&self) -> Indent {
        Indent::new(&self.indent_unit, self.body_depth)
    }

    pub fn apparatus_indent(&self) -> Indent {
        Indent::new(&self.indent_unit, self.apparatus_depth)
    }

    pub fn witness_indent(&self) -> Indent {
        Indent::new(&self.indent_unit, self.witness_depth)
    }
}

/// Parse a settings file. Fields left out keep their defaults.
pub fn build_settings(input: &str) -> Result<XmlSettings, String> {
    match from_str(input) {
        Ok(s) => {
            debug!(slog_scope::logger(), "Settings file parsed");
            Ok(s)
        }
        Err(e) => {
            let err_msg = format!("error deserializing the settings file: {}", e);
            Err(err_msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_file() {
        let ron_string = r#"
(
    indent_unit: "\t",
    body_depth: 2,
    apparatus_depth: 1,
    witness_depth: 4,
)
"#;
        let settings = build_settings(ron_string).unwrap();
        assert_eq!(settings.indent_unit, "\t");
        assert_eq!(settings.body_indent().line("<p>"), "\t\t<p>");
        assert_eq!(settings.apparatus_indent().line("<app>"), "\t<app>");
        assert_eq!(settings.witness_depth, 4);
    }

    #[test]
    fn partial_file() {
        let settings = build_settings("(body_depth: 1)").unwrap();
        assert_eq!(settings.body_depth, 1);
        assert_eq!(settings.indent_unit, "    ");
        assert_eq!(settings.apparatus_depth, 0);
    }

    #[test]
    fn empty_struct() {
        assert_eq!(build_settings("()").unwrap(), XmlSettings::default());
    }

    #[test]
    fn bad_file() {
        assert!(build_settings("(body_depth: \"three\")")
            .unwrap_err()
            .contains("error deserializing the settings file"));
    }
}
