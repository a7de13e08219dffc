//! Contains the main aphorist function. Determines which parts of aphorist to
//! run.

pub mod apparatus;
pub mod check;
pub mod config;
pub mod document;
pub mod error;
mod fs;
pub mod settings;

use crate::apparatus::FootnoteTable;
use crate::config::{AphoristCommand, AphoristConfig, CheckConfig};
use crate::document::{convert, document_number, fill, ConvertOptions, DEFAULT_TEMPLATE};
use crate::settings::{build_settings, XmlSettings};
use ansi_term::Color;
use fs::{create_output_dir, load_file, save_file, text_files};
use slog::{debug, error, info, o, warn};
use std::path::Path;

/// The main aphorist function.
pub fn aphorist(config: AphoristConfig) -> Result<(), String> {
    // Check subcommands.
    match config.command {
        AphoristCommand::NewSettingsFile => {
            debug!(slog_scope::logger(), "Creating blank settings file");
            return fs::new_settings_ron();
        }
        AphoristCommand::Check(check_config) => {
            return slog_scope::scope(&slog_scope::logger().new(o!("fn" => "check()")), || {
                check_footnotes(&check_config)
            });
        }
        AphoristCommand::Main => {}
    }

    let convert_config = config
        .convert_config
        .ok_or_else(|| "no input given".to_string())?;

    eprintln!("{} Starting aphorist...", Color::Green.paint("INFO"));

    let settings = match convert_config.settings {
        Some(s) => {
            let settings = slog_scope::scope(
                &slog_scope::logger().new(o!("fn" => "load_file()")),
                || load_file(Path::new(s)),
            )
            .map_err(|e| format!("Settings load error: {}", e))?;
            build_settings(&settings)?
        }
        None => XmlSettings::default(),
    };

    let template = match convert_config.template {
        Some(t) => slog_scope::scope(&slog_scope::logger().new(o!("fn" => "load_file()")), || {
            load_file(Path::new(t))
        })
        .map_err(|e| format!("Template load error: {}", e))?,
        None => DEFAULT_TEMPLATE.to_string(),
    };

    let files = text_files(Path::new(convert_config.input))?;
    if files.is_empty() {
        return Err(format!("no .txt files found in {}", convert_config.input));
    }
    let output_dir = Path::new(convert_config.output_dir);
    create_output_dir(output_dir)?;

    let mut failed = 0;
    for file in &files {
        eprintln!(
            "{} Converting {}...",
            Color::Green.paint("INFO"),
            Color::Blue.paint(file.to_string_lossy())
        );
        if let Err(e) = slog_scope::scope(
            &slog_scope::logger().new(o!("file" => file.to_string_lossy().to_string())),
            || convert_file(file, output_dir, &template, &settings),
        ) {
            error!(slog_scope::logger(), "Unable to convert {}: {}", file.to_string_lossy(), e);
            eprintln!(
                "{} Unable to convert {}: {}",
                Color::Red.paint("ERRO"),
                file.to_string_lossy(),
                e
            );
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} files could not be converted", failed, files.len()));
    }

    eprintln!("{} Done", Color::Green.paint("INFO"));
    Ok(())
}

/// Convert one transcription into `<stem>_main.xml` and `<stem>_app.xml`.
fn convert_file(
    path: &Path,
    output_dir: &Path,
    template: &str,
    settings: &XmlSettings,
) -> Result<(), String> {
    let text = load_file(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| format!("{} is not a file name", path.to_string_lossy()))?;

    let (main, app) = render_document(&text, document_number(&stem), template, settings)?;

    save_file(&output_dir.join(format!("{}_main.xml", stem)), &main)?;
    save_file(&output_dir.join(format!("{}_app.xml", stem)), &app)
}

/// The main and apparatus files for a transcription.
fn render_document(
    text: &str,
    doc_num: usize,
    template: &str,
    settings: &XmlSettings,
) -> Result<(String, String), String> {
    let options = ConvertOptions { settings, doc_num };
    let converted = slog_scope::scope(&slog_scope::logger().new(o!("fn" => "convert()")), || {
        convert(text, &options)
    })
    .map_err(|e| e.to_string())?;

    for failure in &converted.failures {
        eprintln!("{} Skipped: {}", Color::Yellow.paint("WARN"), failure);
    }
    if !converted.issues.is_empty() {
        eprintln!(
            "{} {} footnote problem(s); run `aphorist check` for details",
            Color::Yellow.paint("WARN"),
            converted.issues.len()
        );
    }
    info!(
        slog_scope::logger(),
        "{} aphorisms, {} witnesses",
        converted.rendered_units,
        converted.witnesses.len()
    );

    let main = fill(template, &converted, &settings.witness_indent()).map_err(|e| e.to_string())?;
    let mut app = converted.apparatus.join("\n");
    app.push('\n');
    Ok((main, app))
}

/// Report on the footnotes of a transcription.
fn check_footnotes(config: &CheckConfig) -> Result<(), String> {
    let text = load_file(Path::new(config.input))?;
    let section = check::footnote_section(&text).map_err(|e| e.to_string())?;
    if section.is_empty() {
        eprintln!("{} No footnotes found", Color::Green.paint("INFO"));
        return Ok(());
    }

    let table = FootnoteTable::from_text(&section).map_err(|e| e.to_string())?;
    let checked = check::checked_footnotes(&table);

    if config.json {
        let json = serde_json::to_string_pretty(&checked).map_err(|e| e.to_string())?;
        println!("{}", json);
        return Ok(());
    }

    let mut problems = 0;
    for footnote in &checked {
        for problem in &footnote.problems {
            warn!(slog_scope::logger(), "Footnote {}: {}", footnote.number, problem);
            eprintln!(
                "{} Footnote {}: {}",
                Color::Yellow.paint("WARN"),
                Color::Blue.paint(footnote.number.to_string()),
                problem
            );
            problems += 1;
        }
        if !footnote.problems.is_empty() {
            eprintln!("     {}", footnote.text);
        }
    }
    eprintln!(
        "{} {} footnotes checked, {} problem(s)",
        Color::Green.paint("INFO"),
        checked.len(),
        problems
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> String {
        load_file(Path::new("./tests/aphorisms_1.txt")).unwrap()
    }

    #[test]
    fn fixture_converts() {
        let (main, app) =
            render_document(&fixture(), 1, DEFAULT_TEMPLATE, &XmlSettings::default()).unwrap();

        assert!(main.starts_with("<?xml"));
        assert!(main.contains("                    <witness xml:id=\"A\">A</witness>\n                    <witness xml:id=\"B\">B</witness>"));
        assert!(main.contains("            <div n=\"1\" type=\"Title_section\">"));
        assert!(main.contains("<rdg>art long</rdg>"));
        assert!(main.contains("<locus target=\"B\">2v</locus>"));
        assert!(main.contains("<div n=\"3\" type=\"aphorism_commentary_unit\">"));
        assert!(!main.contains("#INSERT"));

        assert_eq!(app.matches("<app from=").count(), 5);
        assert!(app.contains("<corr type=\"conjecture\">plethoric state</corr>"));
        assert!(app.contains("<add reason=\"add_scribe\">very</add>"));
        assert!(app.ends_with("</app>\n"));
    }

    #[test]
    fn fixture_has_clean_footnotes() {
        let section = check::footnote_section(&fixture()).unwrap();
        let table = FootnoteTable::from_text(&section).unwrap();
        assert_eq!(table.len(), 5);
        assert!(table.verify().is_empty());
    }

    #[test]
    fn template_without_body_marker() {
        assert!(
            render_document(&fixture(), 1, "<TEI/>", &XmlSettings::default())
                .unwrap_err()
                .contains("#INSERTBODY#")
        );
    }

    #[test]
    fn broken_document() {
        assert!(render_document(
            "Title\n1.\nword*1*",
            1,
            DEFAULT_TEMPLATE,
            &XmlSettings::default()
        )
        .unwrap_err()
        .contains("no footnote section"));
    }
}
