//! Footnote classification.
//!
//! A footnote reads `base ] clause`, where `base` is the reading of the main
//! text and `clause` says how the witnesses differ from it. There are five
//! kinds of clause, told apart by a keyword:
//!
//! * omission: `ssss ] W1: om. W2` (optionally `correxi: tttt W1: om. W2`);
//! * addition: `ssss ] add. tttt W1, W2` or `ssss ] add. tttt W1: uuuu W2`;
//! * correxi: `ssss ] correxi: tttt W1: uuuu W2`;
//! * conieci: `ssss ] conieci: tttt W1, W2`;
//! * standard variant: `ssss ] W1: tttt W2`.
//!
//! Anything after a final `;` is an editorial note carried alongside the
//! variant.

use crate::error::ClassificationError;
use serde::Serialize;
use slog::{trace, warn};

/// The five variant grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VariantKind {
    Omission,
    Addition,
    Correxi,
    Conieci,
    Standard,
}

/// An editorial intervention attached to an omission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditorialReason {
    Correxi,
    Conieci,
}

impl EditorialReason {
    /// The connective introducing the editor's readings.
    pub fn connective(self) -> &'static str {
        match self {
            EditorialReason::Correxi => "correxi:",
            EditorialReason::Conieci => "conieci:",
        }
    }
}

/// What one witness reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WitnessReading {
    pub witness: String,
    pub variant_text: Option<String>,
    pub is_omitted: bool,
}

impl WitnessReading {
    fn reads(witness: String, text: String) -> WitnessReading {
        WitnessReading {
            witness,
            variant_text: Some(text),
            is_omitted: false,
        }
    }

    fn omits(witness: String) -> WitnessReading {
        WitnessReading {
            witness,
            variant_text: None,
            is_omitted: true,
        }
    }
}

/// A classified footnote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantRecord {
    pub kind: VariantKind,
    pub base_text: String,
    pub editorial_reason: Option<EditorialReason>,
    pub witness_readings: Vec<WitnessReading>,
    pub note: Option<String>,
}

impl VariantRecord {
    fn new(kind: VariantKind, base_text: &str, witness_readings: Vec<WitnessReading>) -> Self {
        VariantRecord {
            kind,
            base_text: base_text.to_string(),
            editorial_reason: None,
            witness_readings,
            note: None,
        }
    }

    /// The witness codes, in order.
    pub fn witnesses(&self) -> impl Iterator<Item = &str> {
        self.witness_readings.iter().map(|r| r.witness.as_str())
    }
}

type Grammar = fn(&str, &str) -> Result<VariantRecord, ClassificationError>;

/// Keyword, kind and grammar, in the order they are tried. Text matching none
/// of the keywords is a standard variant.
const GRAMMARS: [(&str, VariantKind, Grammar); 4] = [
    ("om.", VariantKind::Omission, omission),
    ("add.", VariantKind::Addition, addition),
    ("correxi", VariantKind::Correxi, correxi),
    ("conieci", VariantKind::Conieci, conieci),
];

/// Classify a footnote and parse it into a [`VariantRecord`].
///
/// `text` may still carry its `*n*` marker and final period; both are
/// dropped before anything else.
pub fn classify(text: &str) -> Result<VariantRecord, ClassificationError> {
    let text = strip_marker(text);
    let (text, note) = split_note(text);
    let (kind, grammar) = dispatch(text);
    trace!(slog_scope::logger(), "Classifying {:?} as {:?}", text, kind);

    let (base, clause) = split_base(text)?;
    let mut record = grammar(base, clause)?;
    record.note = note;
    Ok(record)
}

/// The kind [`classify`] would pick for `text`, without parsing it.
pub fn variant_kind(text: &str) -> VariantKind {
    let text = strip_marker(text);
    dispatch(split_note(text).0).0
}

fn dispatch(text: &str) -> (VariantKind, Grammar) {
    GRAMMARS
        .iter()
        .find(|(keyword, _, _)| text.contains(keyword))
        .map(|&(_, kind, grammar)| (kind, grammar))
        .unwrap_or((VariantKind::Standard, standard))
}

/// Drop a leading `*n*` and the final period.
fn strip_marker(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix('*')
        .and_then(|rest| rest.split_once('*'))
        .filter(|(number, _)| !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()))
        .map(|(_, rest)| rest)
        .unwrap_or(text);
    text.trim().trim_end_matches('.').trim_end()
}

/// Split off the editorial note after the last `;`.
fn split_note(text: &str) -> (&str, Option<String>) {
    match text.rsplit_once(';') {
        Some((variant, note)) => {
            let note = note.trim();
            (variant, (!note.is_empty()).then(|| note.to_string()))
        }
        None => (text, None),
    }
}

fn split_base(text: &str) -> Result<(&str, &str), ClassificationError> {
    let brackets = text.matches(']').count();
    let (base, clause) = match text.split_once(']') {
        Some(parts) if brackets == 1 => parts,
        _ => return Err(ClassificationError::BaseDelimiter(brackets)),
    };
    let clause = clause.trim();
    if clause.is_empty() {
        return Err(ClassificationError::EmptyClause);
    }
    Ok((base.trim(), clause))
}

/// Trim whitespace and trailing separators.
fn clean(field: &str) -> String {
    field
        .trim()
        .trim_end_matches(|c: char| matches!(c, ',' | ':' | ';'))
        .trim()
        .to_string()
}

fn witness_code(item: &str, segment: &str) -> Result<String, ClassificationError> {
    let code = clean(item);
    if code.is_empty() {
        return Err(ClassificationError::MissingWitness);
    }
    if code.contains(char::is_whitespace) {
        return Err(ClassificationError::AmbiguousWitnessList(
            segment.trim().to_string(),
        ));
    }
    Ok(code)
}

/// Parse `reading W1[, W2...]` into the reading (possibly empty) and the
/// witness codes.
fn reading_group(segment: &str) -> Result<(String, Vec<String>), ClassificationError> {
    let mut items = segment.trim().split(',');
    let first = items.next().unwrap_or_default().trim();

    let (reading, first_witness) = match first.rsplit_once(char::is_whitespace) {
        Some((reading, witness)) => (reading, witness),
        None => ("", first),
    };

    let mut witnesses = vec![witness_code(first_witness, segment)?];
    for item in items {
        witnesses.push(witness_code(item, segment)?);
    }
    Ok((clean(reading), witnesses))
}

/// Parse `:`-separated reading groups, each witness getting its group's
/// reading. Every group needs a reading.
fn grouped_readings(rest: &str) -> Result<Vec<WitnessReading>, ClassificationError> {
    let mut readings = Vec::new();
    for segment in rest.split(':') {
        let (reading, witnesses) = reading_group(segment)?;
        if reading.is_empty() {
            return Err(ClassificationError::EmptyReading);
        }
        for witness in witnesses {
            readings.push(WitnessReading::reads(witness, reading.clone()));
        }
    }
    Ok(readings)
}

/// A leading `correxi:` or `conieci:` in an omission clause.
fn leading_reason(clause: &str) -> Option<(EditorialReason, &str)> {
    let (head, rest) = clause.split_once(':')?;
    match head.trim() {
        "correxi" => Some((EditorialReason::Correxi, rest)),
        "conieci" => Some((EditorialReason::Conieci, rest)),
        _ => None,
    }
}

/// A `correxi` or `conieci` that is not the `correxi:` or `conieci:` opening
/// an omission clause.
pub(crate) fn misplaced_reason(clause: &str) -> Option<EditorialReason> {
    if leading_reason(clause).is_some() {
        return None;
    }
    [EditorialReason::Correxi, EditorialReason::Conieci]
        .into_iter()
        .find(|reason| clause.contains(reason.connective().trim_end_matches(':')))
}

fn omission(base: &str, clause: &str) -> Result<VariantRecord, ClassificationError> {
    if let Some(reason) = misplaced_reason(clause) {
        return Err(ClassificationError::MissingConnective(reason.connective()));
    }
    let (reason, clause) = match leading_reason(clause) {
        Some((reason, rest)) => (Some(reason), rest),
        None => (None, clause),
    };

    let (present, omitted) = clause
        .split_once("om.")
        .ok_or(ClassificationError::MissingConnective("om."))?;

    let mut readings = Vec::new();

    let present = present.trim_matches(|c: char| c == ':' || c.is_whitespace());
    if !present.is_empty() {
        let (reading, witnesses) = reading_group(present)?;
        let reading = if reading.is_empty() {
            base.to_string()
        } else {
            reading
        };
        for witness in witnesses {
            readings.push(WitnessReading::reads(witness, reading.clone()));
        }
    }

    for item in omitted.split(',') {
        readings.push(WitnessReading::omits(witness_code(item, omitted)?));
    }

    let mut record = VariantRecord::new(VariantKind::Omission, base, readings);
    record.editorial_reason = reason;
    Ok(record)
}

fn addition(base: &str, clause: &str) -> Result<VariantRecord, ClassificationError> {
    let (_, rest) = clause
        .split_once("add.")
        .ok_or(ClassificationError::MissingConnective("add."))?;
    Ok(VariantRecord::new(
        VariantKind::Addition,
        base,
        grouped_readings(rest)?,
    ))
}

fn editorial(
    base: &str,
    clause: &str,
    reason: EditorialReason,
    kind: VariantKind,
) -> Result<VariantRecord, ClassificationError> {
    let (_, rest) = clause
        .split_once(reason.connective())
        .ok_or(ClassificationError::MissingConnective(reason.connective()))?;
    Ok(VariantRecord::new(kind, base, grouped_readings(rest)?))
}

fn correxi(base: &str, clause: &str) -> Result<VariantRecord, ClassificationError> {
    editorial(base, clause, EditorialReason::Correxi, VariantKind::Correxi)
}

fn conieci(base: &str, clause: &str) -> Result<VariantRecord, ClassificationError> {
    editorial(base, clause, EditorialReason::Conieci, VariantKind::Conieci)
}

/// Words before the first witness of a standard variant. The first witness
/// reads the main text, so these go nowhere.
pub(crate) fn stray_standard_text(clause: &str) -> Option<String> {
    let (first, _) = clause.split_once(':')?;
    let (stray, _) = reading_group(first).ok()?;
    (!stray.is_empty()).then_some(stray)
}

fn standard(base: &str, clause: &str) -> Result<VariantRecord, ClassificationError> {
    let shape_error = || ClassificationError::StandardShape(clause.to_string());

    if clause.contains(',') {
        return Err(shape_error());
    }
    let (first, second) = clause.split_once(':').ok_or_else(shape_error)?;
    if second.contains(':') {
        return Err(shape_error());
    }

    // The first witness reads the main text.
    let (stray, first_witnesses) = reading_group(first)?;
    if !stray.is_empty() {
        warn!(
            slog_scope::logger(),
            "Ignoring {:?} before the first witness of {:?}", stray, clause
        );
    }
    let (reading, second_witnesses) = reading_group(second)?;
    if reading.is_empty() {
        return Err(ClassificationError::EmptyReading);
    }

    let mut readings = Vec::with_capacity(2);
    for witness in first_witnesses {
        readings.push(WitnessReading::reads(witness, base.to_string()));
    }
    for witness in second_witnesses {
        readings.push(WitnessReading::reads(witness, reading.clone()));
    }
    Ok(VariantRecord::new(VariantKind::Standard, base, readings))
}
