//! Read-only form enumeration.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::form::{DEFAULT_ACTION, DEFAULT_METHOD, FormRecord};
use crate::identifiers::TabId;

use super::{ActiveTab, PageHost, scripts};

// ============================================================================
// Public Functions
// ============================================================================

/// Scans every form in the given tab.
///
/// Forms come back in document order and fields in `elements` order. The
/// page is not modified.
///
/// # Errors
///
/// Returns [`Error::InjectionFailed`] if the scan cannot run or its result
/// is not an array of form records.
pub async fn scan<H>(host: &H, tab_id: TabId) -> Result<Vec<FormRecord>>
where
    H: PageHost + ?Sized,
{
    debug!(tab_id = %tab_id, "Scanning forms");

    let value = host
        .call_function(tab_id, scripts::SCAN_FORMS, Vec::new())
        .await?;
    let forms = decode_scan(value)?;

    info!(tab_id = %tab_id, forms = forms.len(), "Scan complete");
    Ok(forms)
}

/// Resolves the active tab and scans it.
///
/// # Errors
///
/// - [`Error::TabUnavailable`] if there is no active tab
/// - [`Error::InjectionFailed`] if the scan fails
pub async fn scan_active<H>(host: &H) -> Result<(ActiveTab, Vec<FormRecord>)>
where
    H: PageHost + ?Sized,
{
    let tab = host.active_tab().await?;
    let forms = scan(host, tab.tab_id).await?;
    Ok((tab, forms))
}

/// Decodes the raw scan result.
fn decode_scan(mut value: Value) -> Result<Vec<FormRecord>> {
    if !value.is_array() {
        return Err(Error::injection_failed(format!(
            "scan returned {} instead of an array",
            json_kind(&value)
        )));
    }

    if let Some(forms) = value.as_array_mut() {
        for (position, form) in forms.iter_mut().enumerate() {
            replace_shadowed_attributes(form, position);
        }
    }

    serde_json::from_value(value)
        .map_err(|e| Error::injection_failed(format!("unexpected scan result: {e}")))
}

/// Records the default for a non-string `action` or `method`.
///
/// A control named `action` or `method` shadows the form property, so a
/// page routine reading it directly gets an element back. One such form
/// must not fail the whole scan.
fn replace_shadowed_attributes(form: &mut Value, position: usize) {
    let Value::Object(fields) = form else {
        return;
    };

    for (key, default) in [("action", DEFAULT_ACTION), ("method", DEFAULT_METHOD)] {
        if fields.get(key).is_some_and(|v| !v.is_string()) {
            warn!(form = position, attribute = key, "Form attribute is not a string, using default");
            fields.insert(key.to_string(), Value::from(default));
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Tests
// ============================================================================
