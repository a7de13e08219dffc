//! Functions for interacting with the file system.

mod file_contents;

use ansi_term::Color;
use file_contents::BLANK_SETTINGS_CONTENTS;
use slog::debug;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Load a file into a string.
///
/// Used for transcriptions, templates and settings files alike.
pub fn load_file(path: &Path) -> Result<String, String> {
    debug!(
        slog_scope::logger(),
        "Loading file {}...",
        path.to_string_lossy()
    );

    match fs::read_to_string(path) {
        Ok(r) => {
            debug!(
                slog_scope::logger(),
                "File {} loaded.",
                path.to_string_lossy()
            );
            Ok(r)
        }
        Err(e) => {
            let err_msg = format!("error reading the file {}: {}", path.to_string_lossy(), e);
            Err(err_msg)
        }
    }
}

/// Save a string in a file.
pub fn save_file(path: &Path, output: &str) -> Result<(), String> {
    debug!(slog_scope::logger(), "Saving {}...", path.to_string_lossy());
    eprintln!(
        "{} Saving {}...",
        Color::Green.paint("INFO"),
        Color::Blue.paint(path.to_string_lossy())
    );

    match fs::write(path, output) {
        Ok(_) => {
            debug!(
                slog_scope::logger(),
                "File {} saved.",
                path.to_string_lossy()
            );
            Ok(())
        }
        Err(e) => {
            let err_msg = format!("error writing the file {}: {}", path.to_string_lossy(), e);
            Err(err_msg)
        }
    }
}

/// Create the output directory if it does not exist yet.
pub fn create_output_dir(path: &Path) -> Result<(), String> {
    if path.is_dir() {
        return Ok(());
    }
    debug!(
        slog_scope::logger(),
        "Creating directory {}...",
        path.to_string_lossy()
    );
    fs::create_dir_all(path).map_err(|e| {
        format!(
            "error creating the directory {}: {}",
            path.to_string_lossy(),
            e
        )
    })
}

/// The transcriptions to convert.
///
/// A file is returned as is. For a directory, every `.txt` file directly in
/// it, sorted by name; subdirectories are not searched.
pub fn text_files(path: &Path) -> Result<Vec<PathBuf>, String> {
    if !path.is_dir() {
        if path.exists() {
            return Ok(vec![path.to_path_buf()]);
        }
        return Err(format!("{} does not exist", path.to_string_lossy()));
    }

    let entries = fs::read_dir(path).map_err(|e| {
        format!(
            "error reading the directory {}: {}",
            path.to_string_lossy(),
            e
        )
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| e.to_string())?;
        let file = entry.path();
        if file.is_file() && file.extension().map_or(false, |e| e == "txt") {
            files.push(file);
        } else {
            debug!(
                slog_scope::logger(),
                "Skipping {}",
                file.to_string_lossy()
            );
        }
    }
    files.sort();
    Ok(files)
}

/// Create a blank settings file.
///
/// Creates a settings file with every setting at its default value, which
/// users can then edit.
pub fn new_settings_ron() -> Result<(), String> {
    eprintln!(
        "{} Creating blank settings file ({})",
        Color::Green.paint("INFO"),
        Color::Blue.paint("blank-settings.ron")
    );

    fs::write("blank-settings.ron", BLANK_SETTINGS_CONTENTS)
        .map_err(|e| format!("unable to write the blank settings file: {}", e))
}
