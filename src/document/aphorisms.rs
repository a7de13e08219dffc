//! Aphorism and commentary units.

use crate::error::DocumentError;
use lazy_static::lazy_static;
use regex::Regex;
use slog::{debug, warn};
use std::collections::BTreeMap;

lazy_static! {
    /// A line holding only an aphorism number, `12.` or `12`.
    static ref NUMBER_LINE: Regex = Regex::new(r"(?m)^[ \t]*([0-9]+)\.?[ \t\r]*$").unwrap();
}

/// One aphorism and the commentaries that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aphorism {
    pub number: usize,
    /// The first non-empty line of the unit.
    pub text: String,
    pub commentaries: Vec<String>,
}

impl Aphorism {
    /// Every line of the unit, aphorism first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.text.as_str()).chain(self.commentaries.iter().map(String::as_str))
    }
}

/// Split the body into units, numbered `1..=N` in order.
///
/// A unit with no text at all is dropped with a warning.
pub fn aphorisms(body: &str) -> Result<Vec<Aphorism>, DocumentError> {
    let numbers: Vec<usize> = NUMBER_LINE
        .captures_iter(body)
        .filter_map(|c| c.get(1).and_then(|n| n.as_str().parse().ok()))
        .collect();
    if numbers.is_empty() {
        return Err(DocumentError::MissingFirstAphorism);
    }
    check_numbering(&numbers)?;

    let mut pieces = NUMBER_LINE.split(body);
    if let Some(before) = pieces.next() {
        if !before.trim().is_empty() {
            warn!(
                slog_scope::logger(),
                "Text before the first aphorism is ignored: {}",
                before.trim()
            );
        }
    }

    let mut units = Vec::with_capacity(numbers.len());
    for (number, piece) in numbers.into_iter().zip(pieces) {
        let mut lines = piece.lines().map(str::trim).filter(|l| !l.is_empty());
        match lines.next() {
            Some(text) => units.push(Aphorism {
                number,
                text: text.to_string(),
                commentaries: lines.map(str::to_string).collect(),
            }),
            None => warn!(slog_scope::logger(), "Aphorism {} is empty", number),
        }
    }

    debug!(slog_scope::logger(), "Found {} aphorisms", units.len());
    Ok(units)
}

fn check_numbering(numbers: &[usize]) -> Result<(), DocumentError> {
    let mut counts = BTreeMap::new();
    for &n in numbers {
        *counts.entry(n).or_insert(0) += 1;
    }

    let max = numbers.iter().copied().max().unwrap_or(0);
    let missing: Vec<usize> = (1..=max).filter(|n| !counts.contains_key(n)).collect();
    let duplicated: Vec<usize> = counts
        .iter()
        .filter(|&(_, &count)| count > 1)
        .map(|(&n, _)| n)
        .collect();
    if !missing.is_empty() || !duplicated.is_empty() {
        return Err(DocumentError::AphorismNumbering {
            missing,
            duplicated,
        });
    }

    for (i, &found) in numbers.iter().enumerate() {
        if found != i + 1 {
            return Err(DocumentError::AphorismOrder {
                expected: i + 1,
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() {
        let body = "1.\nFirst aph\nComm one\n\n Comm two \n2\nSecond aph\n3.\nThird";
        let units = aphorisms(body).unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].number, 1);
        assert_eq!(units[0].text, "First aph");
        assert_eq!(units[0].commentaries, vec!["Comm one", "Comm two"]);
        assert_eq!(units[1].text, "Second aph");
        assert!(units[1].commentaries.is_empty());
        assert_eq!(units[2].lines().collect::<Vec<_>>(), vec!["Third"]);
    }

    #[test]
    fn numbers_in_running_text_are_kept() {
        let units = aphorisms("1.\nAph with 2.\n2.\nNext").unwrap();
        assert_eq!(units[0].text, "Aph with 2.");
        assert_eq!(units.len(), 2);
    }

    #[test]
    fn empty_unit_is_dropped() {
        let units = aphorisms("1.\n\n2.\nSecond").unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].number, 2);
    }

    #[test]
    fn missing_and_duplicated() {
        assert_eq!(
            aphorisms("1.\na\n3.\nb\n3.\nc\n5.\nd"),
            Err(DocumentError::AphorismNumbering {
                missing: vec![2, 4],
                duplicated: vec![3],
            })
        );
    }

    #[test]
    fn out_of_order() {
        assert_eq!(
            aphorisms("2.\na\n1.\nb"),
            Err(DocumentError::AphorismOrder {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn no_numbers() {
        assert_eq!(aphorisms("just text"), Err(DocumentError::MissingFirstAphorism));
    }
}
