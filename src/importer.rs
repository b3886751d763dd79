//! Reads exported files back into form records.
//!
//! The file is read in full first. The format is then chosen from the file
//! extension (`.json` or `.xml`, case-insensitive) and the text is decoded
//! and shape-checked. Every failure is also reported as an `ERROR`
//! diagnostic before it is returned.

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codec;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::form::{ExportFormat, FormRecord};

// ============================================================================
// ImportedForm
// ============================================================================

/// A record read from disk, keyed to the form it should fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedForm {
    /// Positional index of the target form in the page.
    pub form_index: usize,
    /// Decoded record.
    pub record: FormRecord,
    /// Format the file was decoded as.
    pub format: ExportFormat,
    /// Source file.
    pub path: PathBuf,
}

// ============================================================================
// Importer
// ============================================================================

/// Reads and decodes import files.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    diagnostics: Diagnostics,
}

impl Importer {
    /// Creates an importer reporting to `diagnostics`.
    #[must_use]
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Imports the chosen file for the form at `form_index`.
    ///
    /// `path` is `None` when the user dismissed the file picker.
    ///
    /// # Errors
    ///
    /// - [`Error::NoFileSelected`] if `path` is `None`
    /// - [`Error::FileRead`] if the file cannot be read as text
    /// - [`Error::UnsupportedFormat`] if the extension is not `.json`/`.xml`
    /// - [`Error::Parse`] / [`Error::MalformedFormData`] from decoding
    pub async fn import(&self, path: Option<&Path>, form_index: usize) -> Result<ImportedForm> {
        let result = self.read_and_decode(path, form_index).await;

        if let Err(e) = &result {
            warn!(error = %e, form_index, "Import failed");
            self.diagnostics.error(format!("Import failed: {e}"));
        }

        result
    }

    async fn read_and_decode(&self, path: Option<&Path>, form_index: usize) -> Result<ImportedForm> {
        let path = path.ok_or(Error::NoFileSelected)?;
        self.diagnostics
            .log(format!("Reading file: {}", path.display()));

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::file_read(path, &e))?;
        debug!(path = %path.display(), bytes = text.len(), "File read");

        let format = ExportFormat::from_path(path)?;
        let record = codec::decode(&text, format)?;

        self.diagnostics.log(format!(
            "Parsed {format} with {} fields for form {form_index}",
            record.field_count()
        ));

        Ok(ImportedForm {
            form_index,
            record,
            format,
            path: path.to_path_buf(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use crate::diagnostics::MemorySink;
    use crate::form::FieldRecord;

    fn importer() -> (Importer, MemorySink) {
        let sink = MemorySink::default();
        (Importer::new(Diagnostics::new(sink.clone())), sink)
    }

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).expect("write");
        path
    }

    #[tokio::test]
    async fn test_import_json() {
        let dir = TempDir::new().expect("tempdir");
        let record = FormRecord::new("login")
            .with_input(FieldRecord::new("text", 0).with_name("user").with_value("ada"));
        let path = write(&dir, "form-login-export.json", &codec::to_json(&record).expect("encode"));

        let (importer, sink) = importer();
        let imported = importer.import(Some(&path), 2).await.expect("import");

        assert_eq!(imported.form_index, 2);
        assert_eq!(imported.format, ExportFormat::Json);
        assert_eq!(imported.record, record);
        assert!(sink.errors().is_empty());
    }

    #[tokio::test]
    async fn test_import_xml_uppercase_extension() {
        let dir = TempDir::new().expect("tempdir");
        let record = FormRecord::new("login").with_input(FieldRecord::new("text", 0));
        let path = write(&dir, "EXPORT.XML", &codec::to_xml(&record));

        let (importer, _) = importer();
        let imported = importer.import(Some(&path), 0).await.expect("import");
        assert_eq!(imported.format, ExportFormat::Xml);
        assert_eq!(imported.record, record);
    }

    #[tokio::test]
    async fn test_import_no_file_selected() {
        let (importer, sink) = importer();
        let err = importer.import(None, 0).await.unwrap_err();

        assert!(matches!(err, Error::NoFileSelected));
        assert_eq!(sink.errors(), vec!["Import failed: No file selected".to_string()]);
    }

    #[tokio::test]
    async fn test_unsupported_format_detected_after_read() {
        let dir = TempDir::new().expect("tempdir");

        // A missing .txt file fails on the read, before format dispatch.
        let (importer, _) = importer();
        let missing = dir.path().join("missing.txt");
        let err = importer.import(Some(&missing), 0).await.unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));

        // An existing one is read, then rejected.
        let present = write(&dir, "notes.txt", "{\"inputs\": []}");
        let err = importer.import(Some(&present), 0).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "txt"));
        assert!(err.is_user_facing());
    }

    #[tokio::test]
    async fn test_import_malformed_form_data() {
        let dir = TempDir::new().expect("tempdir");
        let path = write(&dir, "bad.json", r#"{ "id": "x", "inputs": "none" }"#);

        let (importer, sink) = importer();
        let err = importer.import(Some(&path), 0).await.unwrap_err();

        assert!(matches!(err, Error::MalformedFormData { .. }));
        assert_eq!(sink.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_import_parse_error_carries_diagnostic() {
        let dir = TempDir::new().expect("tempdir");
        let path = write(&dir, "broken.xml", "<form><inputs></form>");

        let (importer, _) = importer();
        let err = importer.import(Some(&path), 0).await.unwrap_err();
        match err {
            Error::Parse { format, message } => {
                assert_eq!(format, ExportFormat::Xml);
                assert!(!message.is_empty());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_import_non_utf8_is_read_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("binary.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).expect("write");

        let (importer, _) = importer();
        let err = importer.import(Some(&path), 0).await.unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
