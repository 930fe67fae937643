pub mod fixtures;

use freedict_editor::{Document, EditorConfig, EditorError};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Parse the sample dictionary
pub fn sample_document() -> Result<Document, EditorError> {
    Ok(Document::parse(fixtures::SAMPLE_DICT)?)
}

/// Write `contents` to `name` inside a fresh temporary directory. The
/// directory lives as long as the returned guard.
pub fn write_temp_file(name: &str, contents: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok((dir, path))
}

/// Load a configuration from JSON written to a temporary file
pub fn config_from_file(json: &str) -> Result<EditorConfig, Box<dyn std::error::Error>> {
    let (_dir, path) = write_temp_file("editor.json", json)?;
    Ok(EditorConfig::load(&path)?)
}
