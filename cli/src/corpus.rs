#![deny(missing_docs)]

//! # Source Corpus
//!
//! Loading, rewriting and storing the files a pass runs over. Passes
//! themselves are pure text functions from `regraft-core`; this module
//! owns every filesystem touch.

use crate::error::{CliError, CliResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// A source file held in memory while a pass rewrites it.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    dirty: bool,
}

impl SourceFile {
    /// Reads the full text. A missing or unreadable file aborts the run.
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(SourceFile {
            path: path.to_path_buf(),
            text,
            dirty: false,
        })
    }

    /// Runs a pure pass over the text and records whether it changed.
    pub fn apply<F>(&mut self, pass: F)
    where
        F: FnOnce(&str) -> String,
    {
        let rewritten = pass(&self.text);
        if rewritten != self.text {
            self.text = rewritten;
            self.dirty = true;
        }
    }

    /// Writes the file back if a pass changed it. The text goes to a
    /// scratch file in the same directory and is renamed into place, so
    /// an interrupted write never leaves the file half rewritten.
    /// Returns whether anything was written.
    pub fn store(&self) -> CliResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut scratch = NamedTempFile::new_in(dir)?;
        scratch.write_all(self.text.as_bytes())?;
        scratch
            .persist(&self.path)
            .map_err(|e| CliError::Io(e.error))?;
        Ok(true)
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The file's path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Enumerates files under `dir` carrying the given extension, in a
/// stable order.
pub fn enumerate_sources(dir: &Path, suffix: &str) -> CliResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(CliError::General(format!(
            "Source directory not found: {:?}",
            dir
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CliError::Io(e.into()))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == suffix) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
