//! Fill plans and value application.
//!
//! A [`FillPlan`] is built from an imported [`FormRecord`] in Rust and sent
//! to the page as plain data. For each step the page resolves a target
//! element, trying these rules in order:
//!
//! 1. [`MatchRule::Id`]: document-wide lookup by element `id`, if non-empty
//! 2. [`MatchRule::Name`]: `[name="..."]` lookup inside the form, if non-empty
//! 3. [`MatchRule::Position`]: the element at the recorded index of the
//!    form's `elements` collection, if its type equals the recorded type
//!
//! Unresolved steps are skipped. Resolved elements are written through
//! `checked` for checkbox/radio controls and through `value` otherwise.
//! Bubbling `input` and `change` events are then dispatched on them.
//!
//! The positional rule is best-effort. It only matches when the page has
//! the same structure as when the record was exported.
//!
//! The name rule takes the first element with that name. Controls sharing
//! a name, such as a radio group, all resolve to its first member, so the
//! last step for the group decides that one element and the rest keep
//! their state. Give grouped controls distinct `id`s to target each one.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::form::{FieldRecord, FormRecord, is_checkable_type};
use crate::identifiers::TabId;

use super::{PageHost, scripts};

// ============================================================================
// FieldWrite
// ============================================================================

/// How a value lands on a resolved control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWrite {
    /// Set `checked`; only the literal `"true"` checks the control.
    Checked(bool),
    /// Set `value`.
    Value(String),
}

impl FieldWrite {
    /// Chooses the write for a control of `control_type` receiving `value`.
    #[must_use]
    pub fn for_control(control_type: &str, value: &str) -> Self {
        if is_checkable_type(control_type) {
            Self::Checked(value == "true")
        } else {
            Self::Value(value.to_string())
        }
    }
}

// ============================================================================
// FillStep
// ============================================================================

/// One field's worth of fill instructions, as sent to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillStep {
    /// Element ID to try first.
    pub id: String,
    /// Element name to try second.
    pub name: String,
    /// Recorded control type, used by the positional rule.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Recorded position, used by the positional rule.
    pub index: usize,
    /// Value for non-checkable controls.
    pub value: String,
    /// State for checkable controls.
    pub checked: bool,
}

impl From<&FieldRecord> for FillStep {
    fn from(field: &FieldRecord) -> Self {
        Self {
            id: field.id.clone(),
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            index: field.index,
            value: field.value.clone(),
            checked: field.value == "true",
        }
    }
}

impl FillStep {
    /// Human-readable handle for logs.
    #[must_use]
    pub fn label(&self) -> String {
        if !self.id.is_empty() {
            format!("#{}", self.id)
        } else if !self.name.is_empty() {
            self.name.clone()
        } else {
            format!("{}[{}]", self.field_type, self.index)
        }
    }

    /// Resolves this step against a scanned snapshot of the target form.
    fn resolve(&self, live: &[FieldRecord]) -> Option<(MatchRule, usize)> {
        if !self.id.is_empty()
            && let Some(field) = live.iter().find(|f| f.id == self.id)
        {
            return Some((MatchRule::Id, field.index));
        }

        if !self.name.is_empty()
            && let Some(field) = live.iter().find(|f| f.name == self.name)
        {
            return Some((MatchRule::Name, field.index));
        }

        live.iter()
            .find(|f| f.index == self.index && f.field_type == self.field_type)
            .map(|f| (MatchRule::Position, f.index))
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Which lookup located the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Matched by element `id`.
    Id,
    /// Matched by `name` attribute.
    Name,
    /// Matched by type at the recorded position.
    Position,
}

/// Outcome of resolving one step against a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The step would write to the element at `element`.
    Matched {
        /// Rule that located the element.
        rule: MatchRule,
        /// Element position in the live form.
        element: usize,
        /// Write that would be applied.
        write: FieldWrite,
    },
    /// No element matched; the step would be skipped.
    Unmatched,
}

// ============================================================================
// FillPlan
// ============================================================================

/// Ordered fill steps for one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillPlan {
    steps: Vec<FillStep>,
}

impl FillPlan {
    /// Builds one step per field, in record order.
    #[must_use]
    pub fn from_record(record: &FormRecord) -> Self {
        Self {
            steps: record.inputs.iter().map(FillStep::from).collect(),
        }
    }

    /// The steps in order.
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[FillStep] {
        &self.steps
    }

    /// Number of steps.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if there is nothing to fill.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resolves every step against a scanned snapshot without touching the page.
    ///
    /// Id lookups are limited to the snapshot's own fields, whereas the page
    /// searches the whole document.
    #[must_use]
    pub fn preview(&self, live: &FormRecord) -> Vec<Resolution> {
        self.steps
            .iter()
            .map(|step| match step.resolve(&live.inputs) {
                Some((rule, element)) => {
                    let control_type = live
                        .inputs
                        .iter()
                        .find(|f| f.index == element)
                        .map(|f| f.field_type.as_str())
                        .unwrap_or_default();
                    Resolution::Matched {
                        rule,
                        element,
                        write: FieldWrite::for_control(control_type, &step.value),
                    }
                }
                None => Resolution::Unmatched,
            })
            .collect()
    }
}

// ============================================================================
// FillReport
// ============================================================================

/// What the page reported after applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FillReport {
    /// Whether a form existed at the requested index.
    pub form_found: bool,
    /// Step positions that were written.
    pub filled: Vec<usize>,
    /// Step positions with no matching element.
    pub skipped: Vec<usize>,
}

// ============================================================================
// Public Functions
// ============================================================================

/// Fills the form at `form_index` in the tab from `record`.
///
/// A missing form or unmatched fields are reported through `diagnostics`
/// and the returned [`FillReport`], not as errors.
///
/// # Errors
///
/// Returns [`Error::InjectionFailed`] if the page routine cannot run or
/// returns an unexpected result.
pub async fn fill<H>(
    host: &H,
    diagnostics: &Diagnostics,
    tab_id: TabId,
    form_index: usize,
    record: &FormRecord,
) -> Result<FillReport>
where
    H: PageHost + ?Sized,
{
    let plan = FillPlan::from_record(record);
    debug!(tab_id = %tab_id, form_index, steps = plan.len(), "Filling form");

    let args = vec![json!(form_index), serde_json::to_value(plan.steps())?];
    let value = host.call_function(tab_id, scripts::FILL_FORM, args).await?;
    let report: FillReport = serde_json::from_value(value)
        .map_err(|e| Error::injection_failed(format!("unexpected fill result: {e}")))?;

    if !report.form_found {
        warn!(tab_id = %tab_id, form_index, "Form not found");
        diagnostics.error(format!("Form not found at index {form_index}"));
        return Ok(report);
    }

    for step in report.skipped.iter().filter_map(|&i| plan.steps().get(i)) {
        diagnostics.log(format!("Could not find element for field: {}", step.label()));
    }

    info!(
        tab_id = %tab_id,
        form_index,
        filled = report.filled.len(),
        skipped = report.skipped.len(),
        "Form filled"
    );
    diagnostics.log(format!(
        "Filled {} of {} fields in form {form_index}",
        report.filled.len(),
        plan.len()
    ));

    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================
