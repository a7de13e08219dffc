//! Division of a transcription into title, introduction, body and footnotes.

use crate::error::DocumentError;
use lazy_static::lazy_static;
use regex::Regex;
use slog::{debug, info, warn};

lazy_static! {
    /// A line holding only `++`, between the title, introduction and body.
    static ref SEPARATOR: Regex = Regex::new(r"(?m)^[ \t]*\+\+[ \t\r]*$").unwrap();

    /// The line that opens the first aphorism, `1.` or `1`.
    static ref FIRST_APHORISM: Regex = Regex::new(r"(?m)^[ \t]*1\.?[ \t\r]*$").unwrap();
}

/// The parts of a transcription, each trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parts {
    pub title: String,
    pub introduction: Option<String>,
    /// The aphorisms, starting with the `1.` line.
    pub body: String,
    /// The footnote section, empty when the document has no footnotes.
    pub footnotes: String,
}

/// Divide a transcription into its parts.
///
/// The footnote section starts at the last `*1*`. Up to two `++` lines then
/// split off the title and introduction:
///
/// * `title ++ introduction ++ body`
/// * `introduction ++ body`
/// * `body`
///
/// When no title is given it is everything before the first aphorism.
pub fn divide(text: &str) -> Result<Parts, DocumentError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DocumentError::Empty);
    }

    let mut parts = Parts::default();

    let rest = match (text.find("*1*"), text.rfind("*1*")) {
        (Some(first), Some(last)) if first == last => {
            return Err(DocumentError::NoFootnoteSection);
        }
        (Some(_), Some(last)) => {
            parts.footnotes = text[last..].trim().to_string();
            &text[..last]
        }
        _ => {
            info!(slog_scope::logger(), "There are no footnotes present");
            text
        }
    };

    let sections: Vec<&str> = SEPARATOR.split(rest).map(str::trim).collect();
    let body = match sections.as_slice() {
        [title, introduction, body] => {
            parts.title = title.to_string();
            parts.introduction = Some(introduction.to_string());
            *body
        }
        [introduction, body] => {
            parts.introduction = Some(introduction.to_string());
            *body
        }
        [body] => *body,
        _ => return Err(DocumentError::Separators(sections.len() - 1)),
    };

    let first = FIRST_APHORISM
        .find(body)
        .ok_or(DocumentError::MissingFirstAphorism)?;

    let before = body[..first.start()].trim();
    if sections.len() == 3 {
        if !before.is_empty() {
            warn!(
                slog_scope::logger(),
                "Text between the introduction and the first aphorism is ignored: {}", before
            );
        }
    } else {
        parts.title = before.to_string();
    }
    if parts.title.is_empty() {
        warn!(slog_scope::logger(), "The document has no title");
    }

    parts.body = body[first.start()..].trim().to_string();
    debug!(slog_scope::logger(), "Document divided");
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_parts() {
        let text = "Title\n++\nIntro line *1*\n++\n1.\nAph *2*\n\n*1*a ] W1: b W2.\n*2*c ] W1: d W2.\n";
        let parts = divide(text).unwrap();
        assert_eq!(parts.title, "Title");
        assert_eq!(parts.introduction.as_deref(), Some("Intro line *1*"));
        assert_eq!(parts.body, "1.\nAph *2*");
        assert_eq!(parts.footnotes, "*1*a ] W1: b W2.\n*2*c ] W1: d W2.");
    }

    #[test]
    fn title_before_first_aphorism() {
        let parts = divide("The title\n1\nFirst aphorism\nA commentary").unwrap();
        assert_eq!(parts.title, "The title");
        assert_eq!(parts.introduction, None);
        assert_eq!(parts.body, "1\nFirst aphorism\nA commentary");
        assert_eq!(parts.footnotes, "");
    }

    #[test]
    fn introduction_then_title() {
        let parts = divide("Intro\n++\nThe title\n1.\nAph").unwrap();
        assert_eq!(parts.introduction.as_deref(), Some("Intro"));
        assert_eq!(parts.title, "The title");
        assert_eq!(parts.body, "1.\nAph");
    }

    #[test]
    fn aphorism_number_inside_text_is_not_a_divider() {
        let parts = divide("Title of book 1.\n1.\nAph").unwrap();
        assert_eq!(parts.title, "Title of book 1.");
    }

    #[test]
    fn single_marker() {
        assert_eq!(
            divide("Title\n1.\nAph *1*"),
            Err(DocumentError::NoFootnoteSection)
        );
        assert_eq!(
            divide("Title\n1.\nAph\n*1*a ] W1: b W2."),
            Err(DocumentError::NoFootnoteSection)
        );
    }

    #[test]
    fn no_first_aphorism() {
        assert_eq!(
            divide("Title\n2.\nAph"),
            Err(DocumentError::MissingFirstAphorism)
        );
    }

    #[test]
    fn too_many_separators() {
        assert_eq!(
            divide("a\n++\nb\n++\nc\n++\n1.\nd"),
            Err(DocumentError::Separators(3))
        );
    }

    #[test]
    fn empty() {
        assert_eq!(divide(" \n "), Err(DocumentError::Empty));
    }
}
