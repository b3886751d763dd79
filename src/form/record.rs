//! Form and field records.
//!
//! A [`FormRecord`] is a plain-data snapshot. It is produced by the page
//! scanner, written by the exporter, and rebuilt by the importer. It is
//! never kept in sync with the live page.
//!
//! # JSON Shape
//!
//! ```json
//! {
//!   "id": "signup",
//!   "action": "https://example.com/join",
//!   "method": "post",
//!   "inputs": [
//!     { "id": "", "name": "email", "type": "text", "value": "a@b.c", "required": true, "index": 0 }
//!   ]
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Action recorded when the form has no `action` attribute.
pub const DEFAULT_ACTION: &str = "No action specified";

/// Method recorded when the form has no `method` attribute.
pub const DEFAULT_METHOD: &str = "get";

// ============================================================================
// FormRecord
// ============================================================================

/// Snapshot of one HTML form's identity and fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRecord {
    /// Form `id`, else `name`, else `form-<n>` (1-based position).
    pub id: String,
    /// Resolved action URL or [`DEFAULT_ACTION`].
    pub action: String,
    /// Submission method or [`DEFAULT_METHOD`].
    pub method: String,
    /// Controls in DOM order.
    pub inputs: Vec<FieldRecord>,
}

impl FormRecord {
    /// Creates an empty record with the given ID and default action/method.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action: DEFAULT_ACTION.to_string(),
            method: DEFAULT_METHOD.to_string(),
            inputs: Vec::new(),
        }
    }

    /// Appends a field and returns `self` for chaining.
    #[must_use]
    pub fn with_input(mut self, field: FieldRecord) -> Self {
        self.inputs.push(field);
        self
    }

    /// Number of recorded controls.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.inputs.len()
    }
}

// ============================================================================
// FieldRecord
// ============================================================================

/// Snapshot of one form control's identity, type, value, and position.
///
/// For `checkbox` and `radio` controls `value` holds the checked state as
/// the literal `"true"` or `"false"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRecord {
    /// Element `id` attribute.
    pub id: String,
    /// Element `name` attribute.
    pub name: String,
    /// Control type (`text`, `checkbox`, `select-one`, `submit`, ...).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Current value.
    pub value: String,
    /// Whether the control is marked `required`.
    pub required: bool,
    /// Position in the owning form's `elements` collection.
    pub index: usize,
}

impl FieldRecord {
    /// Creates a field of the given type at `index`.
    #[must_use]
    pub fn new(field_type: impl Into<String>, index: usize) -> Self {
        Self {
            field_type: field_type.into(),
            index,
            ..Self::default()
        }
    }

    /// Sets the element ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the element name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Returns `true` if a control of this type is written through `checked`.
#[inline]
#[must_use]
pub fn is_checkable_type(field_type: &str) -> bool {
    matches!(field_type, "checkbox" | "radio")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_action_and_method() {
        let form = FormRecord::new("login");
        assert_eq!(form.action, DEFAULT_ACTION);
        assert_eq!(form.method, DEFAULT_METHOD);
        assert_eq!(form.field_count(), 0);
    }

    #[test]
    fn test_field_type_serializes_as_type() {
        let field = FieldRecord::new("email", 0).with_name("email");
        let json = serde_json::to_value(&field).expect("serialize");
        assert_eq!(json["type"], "email");
        assert!(json.get("field_type").is_none());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let field: FieldRecord = serde_json::from_str(r#"{"name": "q"}"#).expect("parse");
        assert_eq!(field.name, "q");
        assert_eq!(field.id, "");
        assert_eq!(field.field_type, "");
        assert!(!field.required);
        assert_eq!(field.index, 0);
    }

    #[test]
    fn test_is_checkable_type() {
        assert!(is_checkable_type("checkbox"));
        assert!(is_checkable_type("radio"));
        assert!(!is_checkable_type("text"));
    }
}
