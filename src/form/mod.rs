//! Form snapshot types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FormRecord`] | One `<form>` and its controls at scan time |
//! | [`FieldRecord`] | One form-associated control |
//! | [`ExportFormat`] | File format for export and import |

// ============================================================================
// Submodules
// ============================================================================

/// Export/import file formats.
pub mod format;

/// Form and field records.
pub mod record;

// ============================================================================
// Re-exports
// ============================================================================

pub use format::ExportFormat;
pub use record::{DEFAULT_ACTION, DEFAULT_METHOD, FieldRecord, FormRecord, is_checkable_type};
