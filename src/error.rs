//! Error types for formexpo.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use formexpo::{Result, codec};
//!
//! fn load(text: &str) -> Result<usize> {
//!     let record = codec::from_json(text)?;
//!     Ok(record.field_count())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Host | [`Error::TabUnavailable`], [`Error::InjectionFailed`], [`Error::FormNotFound`] |
//! | Import | [`Error::NoFileSelected`], [`Error::FileRead`], [`Error::Parse`], [`Error::MalformedFormData`], [`Error::UnsupportedFormat`] |
//! | Configuration | [`Error::Config`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::Protocol`], [`Error::RequestTimeout`] |
//! | External | [`Error::Io`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::form::ExportFormat;
use crate::identifiers::RequestId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Host Errors
    // ========================================================================
    /// No active tab in the current window.
    #[error("No active tab available")]
    TabUnavailable,

    /// A page-context routine could not run or returned unusable data.
    #[error("Script injection failed: {message}")]
    InjectionFailed {
        /// Description reported by the script host.
        message: String,
    },

    /// No form at the given position on the page.
    #[error("Form not found at index {index}")]
    FormNotFound {
        /// Positional index that was requested.
        index: usize,
    },

    // ========================================================================
    // Import Errors
    // ========================================================================
    /// The user did not choose a file.
    #[error("No file selected")]
    NoFileSelected,

    /// The chosen file could not be read.
    #[error("Failed to read file {}: {message}", path.display())]
    FileRead {
        /// File that failed to read.
        path: PathBuf,
        /// Platform error description.
        message: String,
    },

    /// The file content is not well-formed JSON or XML.
    #[error("Failed to parse {format} form data: {message}")]
    Parse {
        /// Format the parser expected.
        format: ExportFormat,
        /// Parser diagnostic.
        message: String,
    },

    /// The document parsed but does not have the shape of a form record.
    #[error("Malformed form data: {message}")]
    MalformedFormData {
        /// What was wrong with the shape.
        message: String,
    },

    /// The file extension is neither `.json` nor `.xml`.
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat {
        /// Offending extension (empty if none).
        extension: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Timed out waiting for the extension to connect.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected response.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Command request timeout.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an injection failure.
    #[inline]
    pub fn injection_failed(message: impl Into<String>) -> Self {
        Self::InjectionFailed {
            message: message.into(),
        }
    }

    /// Creates a form-not-found error.
    #[inline]
    pub fn form_not_found(index: usize) -> Self {
        Self::FormNotFound { index }
    }

    /// Creates a file read error.
    #[inline]
    pub fn file_read(path: impl Into<PathBuf>, err: &IoError) -> Self {
        Self::FileRead {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Creates a parse error for the given format.
    #[inline]
    pub fn parse(format: ExportFormat, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Creates a malformed form data error.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedFormData {
            message: message.into(),
        }
    }

    /// Creates an unsupported format error.
    #[inline]
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the message should be shown to the user as an alert.
    ///
    /// Only content problems with a chosen file qualify.
    #[inline]
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::MalformedFormData { .. } | Self::UnsupportedFormat { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
