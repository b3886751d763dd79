//! Export/import file formats.
//!
//! The importer dispatches on the file extension only, never on MIME type.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// ExportFormat
// ============================================================================

/// Serialized form of a [`FormRecord`](super::FormRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Fixed-schema XML document.
    Xml,
}

impl ExportFormat {
    /// File picker filter for importable files.
    pub const ACCEPT: &'static str = ".json,.xml";

    /// All supported formats.
    pub const ALL: [Self; 2] = [Self::Json, Self::Xml];

    /// File extension without the leading dot.
    #[inline]
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Resolves a format from a bare extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for anything but `json` or `xml`.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(Error::unsupported_format(extension)),
        }
    }

    /// Resolves a format from a file path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if the path has no extension or
    /// an unsupported one.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy())
            .unwrap_or_default();
        Self::from_extension(&extension)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s.trim_start_matches('.'))
    }
}

// ============================================================================
// Tests
// ============================================================================
