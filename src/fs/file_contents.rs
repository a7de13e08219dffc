//! Contains the constants for file contents.

/// Contents of the blank settings file.
pub static BLANK_SETTINGS_CONTENTS: &str = r#"// Layout of the generated XML.
// Every line of XML is indented with `indent_unit` repeated some number of
// times. The depths below say how many times, for each kind of line:
//
// body_depth: the title, introduction and aphorisms, inserted at #INSERTBODY#
// apparatus_depth: the <app> entries of the apparatus file
// witness_depth: the <witness> entries, inserted at #INSERTWITNESSES#
//
// Any line can be deleted to keep its default, which is the value shown.

(
    indent_unit: "    ",
    body_depth: 3,
    apparatus_depth: 0,
    witness_depth: 5,
)
"#;
