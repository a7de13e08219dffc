//! Witness references.
//!
//! A reference is written `[W L]` in the transcription, where `W` is a witness
//! code and `L` a location in that witness (a folio, a page). Each one becomes
//! `<locus target="W">L</locus>` on a line of its own.

use crate::error::ReferenceError;
use slog::trace;

/// A witness reference found in a line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessReference {
    pub witness: String,
    pub location: String,
}

impl WitnessReference {
    fn to_xml(&self) -> String {
        format!(
            "<locus target=\"{}\">{}</locus>",
            self.witness, self.location
        )
    }
}

/// Replace every `[W L]` in `line` with `<locus>` markup.
///
/// A newline goes between a `<locus>` and any text next to it, so each
/// `<locus>` ends up on its own line once the splicer splits the result.
pub fn resolve_references(line: &str) -> Result<String, ReferenceError> {
    resolve_witnesses(line).map(|(text, _)| text)
}

/// Same as [`resolve_references`], also returning the references in the order
/// they were found.
pub fn resolve_witnesses(line: &str) -> Result<(String, Vec<WitnessReference>), ReferenceError> {
    let mut result = String::with_capacity(line.len());
    let mut found = Vec::new();
    let mut rest = line;

    loop {
        let (before, after) = match rest.split_once('[') {
            Some((before, after)) => (before, Some(after)),
            None => (rest, None),
        };

        if !before.is_empty() {
            result.push_str(before);
            if after.is_some() {
                result.push('\n');
            }
        }

        let after = match after {
            Some(a) => a,
            None => break,
        };

        let (body, tail) = after
            .split_once(']')
            .ok_or_else(|| ReferenceError::Unclosed(after.to_string()))?;

        let (witness, location) = body
            .split_once(' ')
            .ok_or_else(|| ReferenceError::MissingSeparator(body.to_string()))?;

        let witness = witness.trim();
        if witness.is_empty() {
            return Err(ReferenceError::EmptyWitness(body.to_string()));
        }

        let reference = WitnessReference {
            witness: witness.to_string(),
            location: location.trim().to_string(),
        };
        trace!(
            slog_scope::logger(),
            "Found reference to {} at {}",
            reference.witness,
            reference.location
        );
        result.push_str(&reference.to_xml());
        found.push(reference);

        if tail.is_empty() {
            break;
        }
        result.push('\n');
        rest = tail;
    }

    Ok((result, found))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_references() {
        let out = resolve_references("Life is short, the art long.").unwrap();
        assert_eq!(out, "Life is short, the art long.");
    }

    #[test]
    fn empty_line() {
        assert_eq!(resolve_references("").unwrap(), "");
    }

    #[test]
    fn reference_in_the_middle() {
        let out = resolve_references("aaa [W1 12r] bbb").unwrap();
        assert_eq!(out, "aaa \n<locus target=\"W1\">12r</locus>\n bbb");
    }

    #[test]
    fn reference_at_both_ends() {
        let out = resolve_references("[W1 12r]aaa[W2 3v]").unwrap();
        assert_eq!(
            out,
            "<locus target=\"W1\">12r</locus>\naaa\n<locus target=\"W2\">3v</locus>"
        );
    }

    #[test]
    fn adjacent_references() {
        let out = resolve_references("[W1 1][W2 2]").unwrap();
        assert_eq!(
            out,
            "<locus target=\"W1\">1</locus>\n<locus target=\"W2\">2</locus>"
        );
    }

    #[test]
    fn location_is_trimmed() {
        let out = resolve_references("[W1  45 ]").unwrap();
        assert_eq!(out, "<locus target=\"W1\">45</locus>");
    }

    #[test]
    fn witnesses_in_order() {
        let (_, refs) = resolve_witnesses("a [B 1] b [A 2] c [B 3]").unwrap();
        let codes: Vec<&str> = refs.iter().map(|r| r.witness.as_str()).collect();
        assert_eq!(codes, vec!["B", "A", "B"]);
        assert_eq!(refs[1].location, "2");
    }

    #[test]
    fn literal_text_survives() {
        let input = "one [W1 1r] two [W2 2v] three";
        let (out, refs) = resolve_witnesses(input).unwrap();
        assert_eq!(refs.len(), 2);

        let mut rebuilt = out.replace('\n', "");
        for r in &refs {
            rebuilt = rebuilt.replacen(&r.to_xml(), "", 1);
        }
        assert_eq!(rebuilt, "one  two  three");
    }

    #[test]
    fn unclosed_bracket() {
        assert!(matches!(
            resolve_references(" [W1 W2 "),
            Err(ReferenceError::Unclosed(_))
        ));
    }

    #[test]
    fn missing_space() {
        assert_eq!(
            resolve_references(" [W1W2] "),
            Err(ReferenceError::MissingSeparator("W1W2".to_string()))
        );
    }

    #[test]
    fn missing_witness() {
        assert!(matches!(
            resolve_references("[ 12r]"),
            Err(ReferenceError::EmptyWitness(_))
        ));
    }
}
