//! Text rendering for scan results and fill outcomes.
//!
//! Every function returns a `String`; printing is left to the caller.

// ============================================================================
// Imports
// ============================================================================

use std::path::Path;

use crate::error::Result;
use crate::form::FormRecord;
use crate::page::{FieldWrite, FillPlan, FillReport, MatchRule, Resolution};

// ============================================================================
// Constants
// ============================================================================

/// Shown when the page has no forms.
pub const NO_FORMS: &str = "No forms found";

/// Shown in place of any scan failure.
pub const SCAN_FAILED: &str = "Unable to analyze forms on this page";

// ============================================================================
// Scan Results
// ============================================================================

/// Renders scanned forms as a numbered list.
///
/// ```text
/// [0] ID/Name: login
///     Action: https://example.com/session
///     Method: post
///     Number of inputs: 3
/// ```
#[must_use]
pub fn render_forms(forms: &[FormRecord]) -> String {
    if forms.is_empty() {
        return NO_FORMS.to_string();
    }

    forms
        .iter()
        .enumerate()
        .map(|(i, form)| {
            format!(
                "[{i}] ID/Name: {}\n    Action: {}\n    Method: {}\n    Number of inputs: {}",
                form.id,
                form.action,
                form.method,
                form.field_count()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a scan outcome; any error becomes [`SCAN_FAILED`].
#[must_use]
pub fn render_scan(result: &Result<Vec<FormRecord>>) -> String {
    match result {
        Ok(forms) => render_forms(forms),
        Err(_) => SCAN_FAILED.to_string(),
    }
}

// ============================================================================
// Export / Fill
// ============================================================================

/// Confirms a saved export.
#[must_use]
pub fn render_export(form: &FormRecord, path: &Path) -> String {
    format!("Exported form {} to {}", form.id, path.display())
}

/// Summarizes a fill.
#[must_use]
pub fn render_fill_report(form_index: usize, plan: &FillPlan, report: &FillReport) -> String {
    if !report.form_found {
        return format!("Form not found at index {form_index}");
    }

    let mut lines = vec![format!(
        "Filled {} of {} fields in form {form_index}",
        report.filled.len(),
        plan.len()
    )];
    lines.extend(
        report
            .skipped
            .iter()
            .filter_map(|&i| plan.steps().get(i))
            .map(|step| format!("  skipped: {}", step.label())),
    );
    lines.join("\n")
}

/// Renders a dry-run resolution, one line per step.
#[must_use]
pub fn render_preview(plan: &FillPlan, resolutions: &[Resolution]) -> String {
    if plan.is_empty() {
        return "Nothing to fill".to_string();
    }

    plan.steps()
        .iter()
        .zip(resolutions)
        .map(|(step, resolution)| match resolution {
            Resolution::Matched {
                rule,
                element,
                write,
            } => format!(
                "  {} -> element {element} by {}: {}",
                step.label(),
                rule_name(*rule),
                describe_write(write)
            ),
            Resolution::Unmatched => format!("  {} -> no match, skipped", step.label()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn rule_name(rule: MatchRule) -> &'static str {
    match rule {
        MatchRule::Id => "id",
        MatchRule::Name => "name",
        MatchRule::Position => "position",
    }
}

fn describe_write(write: &FieldWrite) -> String {
    match write {
        FieldWrite::Checked(true) => "check".to_string(),
        FieldWrite::Checked(false) => "uncheck".to_string(),
        FieldWrite::Value(value) => format!("value {value:?}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
