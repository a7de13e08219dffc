//! The critical-apparatus engine.
//!
//! A line of transcription goes through two passes. [`references`] turns
//! `[WITNESS LOCATION]` into `<locus>` markup; [`splice`] then finds the
//! `*n*` footnote markers, anchors the flagged words in the main text and,
//! for each footnote, [`classify`]s the footnote text and [`render`]s the
//! apparatus entry. The [`footnotes`] table is built once per document.

pub mod classify;
pub mod footnotes;
pub mod references;
pub mod render;
pub mod splice;

pub use classify::{classify, EditorialReason, VariantKind, VariantRecord, WitnessReading};
pub use footnotes::{FootnoteIssue, FootnoteProblem, FootnoteTable};
pub use references::{resolve_references, resolve_witnesses, WitnessReference};
pub use render::{render, render_app, Indent};
pub use splice::{skip_footnotes, Spliced, Splicer};
