//! FormExpo - Scan, export and refill HTML forms in the active browser tab.
//!
//! This library drives a companion browser extension to read every form
//! on the current page, save a form as JSON or XML, and later apply such
//! a file back onto a live form.
//!
//! # Architecture
//!
//! The crate follows a client-server model:
//!
//! - **Local End (Rust)**: Sends commands, receives events via WebSocket
//! - **Remote End (Extension)**: Runs page routines in the tab, emits events
//!
//! Key design principles:
//!
//! - Page routines are JavaScript function declarations that take and
//!   return plain JSON only
//! - Protocol uses `module.methodName` format
//! - Records are snapshots: created fresh on every scan, never cached
//! - Every user action is one linear pipeline; none is retried
//!
//! # Quick Start
//!
//! ```no_run
//! use formexpo::{ExportFormat, Exporter, Result, Session, workflow};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Session::builder().port(7878).build()?;
//!     let session = Session::listen(config).await?.accept().await?;
//!
//!     let forms = workflow::scan_page(&session).await?;
//!     println!("{}", formexpo::display::render_forms(&forms));
//!
//!     let exporter = Exporter::new(session.download_dir());
//!     let saved = workflow::export_form(&session, &exporter, 0, ExportFormat::Json).await?;
//!     println!("saved {}", saved.path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`form`] | [`FormRecord`], [`FieldRecord`], [`ExportFormat`] |
//! | [`codec`] | JSON and XML text encoding |
//! | [`exporter`] | Atomic export files |
//! | [`importer`] | Import file reading and decoding |
//! | [`page`] | [`PageHost`] seam, scanner and filler |
//! | [`workflow`] | End-to-end user actions |
//! | [`display`] | Text rendering |
//! | [`session`] | Extension session and configuration |
//! | [`diagnostics`] | One-way log messages |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | WebSocket message types (internal) |
//! | [`transport`] | WebSocket transport layer (internal) |

// ============================================================================
// Modules
// ============================================================================

/// JSON and XML encoding of form records.
pub mod codec;

/// One-way diagnostic messages.
pub mod diagnostics;

/// Text rendering for the command line.
pub mod display;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Export file writing.
pub mod exporter;

/// Form snapshot types.
pub mod form;

/// Type-safe identifiers for protocol entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Import file reading.
pub mod importer;

/// Page-context operations: scan and fill.
pub mod page;

/// WebSocket protocol message types.
///
/// Internal module defining command/response/event structures.
pub mod protocol;

/// Extension session and configuration.
pub mod session;

/// WebSocket transport layer.
///
/// Internal module handling WebSocket server and connection management.
pub mod transport;

/// End-to-end user actions.
pub mod workflow;

// ============================================================================
// Re-exports
// ============================================================================

// Form types
pub use form::{ExportFormat, FieldRecord, FormRecord};

// Page types
pub use page::{ActiveTab, FillPlan, FillReport, PageHost};

// File types
pub use exporter::Exporter;
pub use importer::{ImportedForm, Importer};

// Session types
pub use session::{Session, SessionBuilder, SessionConfig};

// Diagnostics
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{RequestId, SessionId, TabId};
