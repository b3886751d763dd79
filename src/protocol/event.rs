//! Event message types.
//!
//! Events are notifications sent from the remote end (extension) to the
//! local end (Rust). The local end never replies to them.
//!
//! # Event Types
//!
//! | Module | Events |
//! |--------|--------|
//! | `tabs` | `updated` |
//! | `session` | `log` |

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::identifiers::RequestId;

// ============================================================================
// Event
// ============================================================================

/// An event notification from remote end to local end.
///
/// # Format
///
/// ```json
/// {
///   "id": "event-uuid",
///   "type": "event",
///   "method": "module.eventName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Unique identifier assigned by the extension.
    pub id: RequestId,

    /// Event type marker (always "event").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event name in `module.eventName` format.
    pub method: String,

    /// Event-specific data.
    #[serde(default)]
    pub params: Value,
}

impl Event {
    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(&self) -> ParsedEvent {
        match self.method.as_str() {
            "tabs.updated" => ParsedEvent::TabUpdated {
                tab_id: self.get_u32("tabId"),
                url: self.get_string("url"),
                status: self.get_string("status"),
            },

            "session.log" => {
                let kind = match self.get_string("kind").as_str() {
                    "ERROR" => DiagnosticKind::Error,
                    _ => DiagnosticKind::Log,
                };
                ParsedEvent::Log(Diagnostic {
                    kind,
                    payload: self.get_string("payload"),
                })
            }

            _ => ParsedEvent::Unknown {
                method: self.method.clone(),
                params: self.params.clone(),
            },
        }
    }

    #[inline]
    fn get_string(&self, key: &str) -> String {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    #[inline]
    fn get_u32(&self, key: &str) -> u32 {
        self.params
            .get(key)
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_default()
    }
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Parsed event types for type-safe handling.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedEvent {
    /// A tab changed state.
    TabUpdated {
        /// Tab ID.
        tab_id: u32,
        /// Current URL.
        url: String,
        /// Load status (`loading` or `complete`).
        status: String,
    },

    /// Diagnostic raised inside the extension.
    Log(Diagnostic),

    /// Unrecognized event.
    Unknown {
        /// Event method.
        method: String,
        /// Raw params.
        params: Value,
    },
}

impl ParsedEvent {
    /// Returns `true` for a tab that finished loading.
    #[inline]
    #[must_use]
    pub fn is_load_complete(&self) -> bool {
        matches!(self, Self::TabUpdated { status, .. } if status == "complete")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: &str) -> Event {
        serde_json::from_str(json).expect("parse")
    }

    #[test]
    fn test_tab_updated_parsing() {
        let event = event(
            r#"{
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "type": "event",
                "method": "tabs.updated",
                "params": { "tabId": 12, "url": "https://example.com/", "status": "complete" }
            }"#,
        );

        let parsed = event.parse();
        assert!(parsed.is_load_complete());
        assert_eq!(
            parsed,
            ParsedEvent::TabUpdated {
                tab_id: 12,
                url: "https://example.com/".into(),
                status: "complete".into(),
            }
        );
    }

    #[test]
    fn test_session_log_parsing() {
        let event = event(
            r#"{
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "type": "event",
                "method": "session.log",
                "params": { "kind": "ERROR", "payload": "content script unavailable" }
            }"#,
        );

        assert_eq!(
            event.parse(),
            ParsedEvent::Log(Diagnostic::error("content script unavailable"))
        );
    }

    #[test]
    fn test_unknown_event() {
        let event = event(
            r#"{
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "type": "event",
                "method": "tabs.removed"
            }"#,
        );

        assert!(matches!(event.parse(), ParsedEvent::Unknown { ref method, .. } if method == "tabs.removed"));
        assert!(!event.parse().is_load_complete());
    }
}
