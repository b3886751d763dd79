//! One-way diagnostic channel.
//!
//! Diagnostics are `{ kind: LOG | ERROR, payload }` messages. They are
//! fire-and-forget: nothing waits for delivery, and a sink that cannot
//! deliver drops the message. They never affect correctness.
//!
//! | Sink | Destination |
//! |------|-------------|
//! | [`TracingSink`] | Local `tracing` subscriber |
//! | `RemoteLogSink` | Extension background console (see [`crate::session`]) |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Diagnostic
// ============================================================================

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiagnosticKind {
    /// Informational message.
    Log,
    /// Failure report.
    Error,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log => f.write_str("LOG"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub kind: DiagnosticKind,
    /// Message text.
    pub payload: String,
}

impl Diagnostic {
    /// Creates a `LOG` diagnostic.
    #[inline]
    #[must_use]
    pub fn log(payload: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Log,
            payload: payload.into(),
        }
    }

    /// Creates an `ERROR` diagnostic.
    #[inline]
    #[must_use]
    pub fn error(payload: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            payload: payload.into(),
        }
    }
}

// ============================================================================
// DiagnosticSink
// ============================================================================

/// Destination for diagnostics.
///
/// Implementations must not block and must swallow delivery failures.
pub trait DiagnosticSink: Send + Sync {
    /// Delivers one diagnostic.
    fn emit(&self, diagnostic: Diagnostic);
}

/// Writes diagnostics to the local `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::Log => info!(kind = %diagnostic.kind, "{}", diagnostic.payload),
            DiagnosticKind::Error => error!(kind = %diagnostic.kind, "{}", diagnostic.payload),
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Cloneable handle to a diagnostic sink.
#[derive(Clone)]
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticSink>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics").finish_non_exhaustive()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(TracingSink)
    }
}

impl Diagnostics {
    /// Wraps a sink.
    #[must_use]
    pub fn new(sink: impl DiagnosticSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Emits a `LOG` diagnostic.
    pub fn log(&self, payload: impl Into<String>) {
        self.sink.emit(Diagnostic::log(payload));
    }

    /// Emits an `ERROR` diagnostic.
    pub fn error(&self, payload: impl Into<String>) {
        self.sink.emit(Diagnostic::error(payload));
    }
}

// ============================================================================
// Test Support
// ============================================================================

/// Collects diagnostics in memory.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct MemorySink {
    messages: Arc<parking_lot::Mutex<Vec<Diagnostic>>>,
}

#[cfg(test)]
impl MemorySink {
    pub(crate) fn messages(&self) -> Vec<Diagnostic> {
        self.messages.lock().clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|d| d.kind == DiagnosticKind::Error)
            .map(|d| d.payload)
            .collect()
    }
}

#[cfg(test)]
impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.messages.lock().push(diagnostic);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_wire_format() {
        let json = serde_json::to_value(Diagnostic::error("boom")).expect("serialize");
        assert_eq!(json["kind"], "ERROR");
        assert_eq!(json["payload"], "boom");

        let parsed: Diagnostic =
            serde_json::from_str(r#"{"kind":"LOG","payload":"hi"}"#).expect("parse");
        assert_eq!(parsed, Diagnostic::log("hi"));
    }

    #[test]
    fn test_handle_routes_to_sink() {
        let sink = MemorySink::default();
        let diagnostics = Diagnostics::new(sink.clone());

        diagnostics.log("reading");
        diagnostics.error("failed");

        assert_eq!(
            sink.messages(),
            vec![Diagnostic::log("reading"), Diagnostic::error("failed")]
        );
        assert_eq!(sink.errors(), vec!["failed".to_string()]);
    }
}
