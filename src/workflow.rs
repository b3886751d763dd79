//! User actions, each one linear pipeline over a [`PageHost`].
//!
//! | Action | Pipeline |
//! |--------|----------|
//! | [`scan_page`] | active tab → scan |
//! | [`export_form`] | active tab → scan → pick form → encode → save |
//! | [`import_into_page`] | read file → decode → active tab → fill |
//! | [`preview_import`] | read file → decode → active tab → scan → resolve |
//!
//! Actions are independent. A failed action leaves nothing behind that
//! affects the next one.

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::exporter::Exporter;
use crate::form::{ExportFormat, FormRecord};
use crate::importer::{ImportedForm, Importer};
use crate::page::{self, FillPlan, FillReport, PageHost, Resolution};

// ============================================================================
// Outcomes
// ============================================================================

/// Result of [`export_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// The exported snapshot.
    pub record: FormRecord,
    /// Saved file.
    pub path: PathBuf,
}

/// Result of [`import_into_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOutcome {
    /// What was read from disk.
    pub imported: ImportedForm,
    /// Steps sent to the page.
    pub plan: FillPlan,
    /// What the page reported.
    pub report: FillReport,
}

/// Result of [`preview_import`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOutcome {
    /// What was read from disk.
    pub imported: ImportedForm,
    /// Steps that would be sent.
    pub plan: FillPlan,
    /// Per-step resolution against the live form.
    pub resolutions: Vec<Resolution>,
}

// ============================================================================
// Actions
// ============================================================================

/// Scans the active tab.
///
/// # Errors
///
/// Any host failure. Callers showing the result replace it with
/// [`display::SCAN_FAILED`](crate::display::SCAN_FAILED).
pub async fn scan_page<H>(host: &H) -> Result<Vec<FormRecord>>
where
    H: PageHost + ?Sized,
{
    let (tab, forms) = page::scan_active(host).await?;
    debug!(tab_id = %tab.tab_id, url = ?tab.url.as_ref().map(|u| u.as_str()), "Page scanned");
    Ok(forms)
}

/// Scans the active tab and saves the form at `form_index`.
///
/// # Errors
///
/// - Host failures from the scan
/// - [`Error::FormNotFound`] if there is no form at `form_index`
/// - [`Error::Io`] if the file cannot be written
pub async fn export_form<H>(
    host: &H,
    exporter: &Exporter,
    form_index: usize,
    format: ExportFormat,
) -> Result<ExportOutcome>
where
    H: PageHost + ?Sized,
{
    let record = scan_page(host)
        .await?
        .into_iter()
        .nth(form_index)
        .ok_or_else(|| Error::form_not_found(form_index))?;

    let path = exporter.export(&record, format)?;
    Ok(ExportOutcome { record, path })
}

/// Reads `path` and fills the form at `form_index` in the active tab.
///
/// # Errors
///
/// - Import failures (already reported through the importer's diagnostics)
/// - Host failures
pub async fn import_into_page<H>(
    host: &H,
    importer: &Importer,
    diagnostics: &Diagnostics,
    path: Option<&Path>,
    form_index: usize,
) -> Result<FillOutcome>
where
    H: PageHost + ?Sized,
{
    let imported = importer.import(path, form_index).await?;
    let tab = host.active_tab().await?;

    let report = page::fill(host, diagnostics, tab.tab_id, form_index, &imported.record).await?;
    let plan = FillPlan::from_record(&imported.record);

    info!(form_index, filled = report.filled.len(), "Import applied");
    Ok(FillOutcome {
        imported,
        plan,
        report,
    })
}

/// Reads `path` and resolves it against the live form without writing.
///
/// # Errors
///
/// - Import failures
/// - Host failures from the scan
/// - [`Error::FormNotFound`] if there is no form at `form_index`
pub async fn preview_import<H>(
    host: &H,
    importer: &Importer,
    path: Option<&Path>,
    form_index: usize,
) -> Result<PreviewOutcome>
where
    H: PageHost + ?Sized,
{
    let imported = importer.import(path, form_index).await?;
    let live = scan_page(host)
        .await?
        .into_iter()
        .nth(form_index)
        .ok_or_else(|| Error::form_not_found(form_index))?;

    let plan = FillPlan::from_record(&imported.record);
    let resolutions = plan.preview(&live);

    Ok(PreviewOutcome {
        imported,
        plan,
        resolutions,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};
    use tempfile::TempDir;

    use crate::diagnostics::MemorySink;
    use crate::page::MatchRule;
    use crate::page::mock::MockHost;
    use crate::page::scripts;

    fn signup_page() -> Value {
        json!([
            { "id": "search", "action": "https://example.com/find", "method": "get", "inputs": [
                { "id": "q", "name": "q", "type": "search", "value": "", "required": false, "index": 0 }
            ] },
            { "id": "signup", "action": "https://example.com/join", "method": "post", "inputs": [
                { "id": "", "name": "email", "type": "email", "value": "ada@example.com", "required": true, "index": 0 },
                { "id": "", "name": "subscribe", "type": "checkbox", "value": "true", "required": false, "index": 1 },
                { "id": "", "name": "", "type": "submit", "value": "Join", "required": false, "index": 2 }
            ] }
        ])
    }

    #[tokio::test]
    async fn test_export_missing_form() {
        let dir = TempDir::new().expect("tempdir");
        let host = MockHost::with_scan(signup_page());

        let err = export_form(&host, &Exporter::new(dir.path()), 7, ExportFormat::Json)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FormNotFound { index: 7 }));
    }

    #[tokio::test]
    async fn test_scan_export_import_fill_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let host = MockHost::with_scan(signup_page());

        let exported = export_form(&host, &Exporter::new(dir.path()), 1, ExportFormat::Json)
            .await
            .expect("export");
        assert_eq!(exported.path, dir.path().join("form-signup-export.json"));

        let sink = MemorySink::default();
        let diagnostics = Diagnostics::new(sink.clone());
        let importer = Importer::new(diagnostics.clone());
        let outcome = import_into_page(&host, &importer, &diagnostics, Some(&exported.path), 1)
            .await
            .expect("import");

        assert_eq!(outcome.imported.record, exported.record);

        let calls = host.calls();
        let fill = calls.last().expect("fill call");
        assert_eq!(fill.function, scripts::FILL_FORM);
        assert_eq!(fill.args[0], json!(1));

        let steps = fill.args[1].as_array().expect("steps");
        let email = steps.iter().find(|s| s["name"] == "email").expect("email step");
        let subscribe = steps.iter().find(|s| s["name"] == "subscribe").expect("subscribe step");
        assert_eq!(email["value"], "ada@example.com");
        assert_eq!(subscribe["checked"], true);
        assert!(sink.errors().is_empty());
    }

    #[tokio::test]
    async fn test_xml_round_trip_through_page() {
        let dir = TempDir::new().expect("tempdir");
        let host = MockHost::with_scan(signup_page());

        let exported = export_form(&host, &Exporter::new(dir.path()), 1, ExportFormat::Xml)
            .await
            .expect("export");
        let preview = preview_import(&host, &Importer::default(), Some(&exported.path), 1)
            .await
            .expect("preview");

        assert_eq!(preview.imported.record, exported.record);
        assert!(preview.resolutions.iter().all(|r| matches!(
            r,
            Resolution::Matched { .. }
        )));
        assert!(matches!(
            preview.resolutions[2],
            Resolution::Matched { rule: MatchRule::Position, element: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_import_failure_skips_page() {
        let host = MockHost::with_scan(signup_page());
        let sink = MemorySink::default();
        let diagnostics = Diagnostics::new(sink.clone());
        let importer = Importer::new(diagnostics.clone());

        let err = import_into_page(&host, &importer, &diagnostics, None, 0)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoFileSelected));
        assert!(host.calls().is_empty());
        assert_eq!(sink.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_fill_missing_form_is_reported_not_failed() {
        let dir = TempDir::new().expect("tempdir");
        let host = MockHost {
            fill_result: json!({ "formFound": false }),
            ..MockHost::with_scan(signup_page())
        };
        let exported = export_form(&host, &Exporter::new(dir.path()), 0, ExportFormat::Json)
            .await
            .expect("export");

        let sink = MemorySink::default();
        let diagnostics = Diagnostics::new(sink.clone());
        let outcome = import_into_page(
            &host,
            &Importer::new(diagnostics.clone()),
            &diagnostics,
            Some(&exported.path),
            9,
        )
        .await
        .expect("fill");

        assert!(!outcome.report.form_found);
        assert_eq!(sink.errors(), vec!["Form not found at index 9".to_string()]);
    }
}
