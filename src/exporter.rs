//! Saves serialized form records as download files.
//!
//! The record is first written to a temporary file inside the target
//! directory. That file is then persisted under its final name in one
//! rename, so a reader never sees a half-written export.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::codec;
use crate::error::{Error, Result};
use crate::form::{ExportFormat, FormRecord};

// ============================================================================
// Public Functions
// ============================================================================

/// Returns the download file name for a record ID.
///
/// Path separators and control characters in the ID are replaced with `_`.
#[must_use]
pub fn export_file_name(id: &str, format: ExportFormat) -> String {
    let safe_id: String = id
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("form-{safe_id}-export.{}", format.extension())
}

/// The user's download directory, or the current directory if unknown.
#[must_use]
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ============================================================================
// Exporter
// ============================================================================

/// Writes exports into one directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(default_download_dir())
    }
}

impl Exporter {
    /// Creates an exporter that saves into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serializes `record` and saves it as `form-<id>-export.<format>`.
    ///
    /// An existing file with the same name is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory or file cannot be written.
    pub fn export(&self, record: &FormRecord, format: ExportFormat) -> Result<PathBuf> {
        let text = codec::encode(record, format)?;
        let path = self.dir.join(export_file_name(&record.id, format));

        fs::create_dir_all(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(text.as_bytes())?;
        staged.flush()?;
        debug!(staged = %staged.path().display(), bytes = text.len(), "Export staged");

        staged.persist(&path).map_err(|e| Error::Io(e.error))?;

        info!(path = %path.display(), %format, fields = record.field_count(), "Form exported");
        Ok(path)
    }
}

// ============================================================================
// Tests
// ============================================================================
