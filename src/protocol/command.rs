//! Command definitions organized by module.
//!
//! # Command Modules
//!
//! | Module | Commands |
//! |--------|----------|
//! | `tabs` | Active tab lookup |
//! | `script` | Page-context function calls |
//! | `session` | Status |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by module.
///
/// This enum wraps module-specific command enums for unified serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Tabs module commands.
    Tabs(TabsCommand),
    /// Script module commands.
    Script(ScriptCommand),
    /// Session module commands.
    Session(SessionCommand),
}

impl Command {
    /// Returns the `module.methodName` of this command.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::Tabs(TabsCommand::QueryActive) => "tabs.queryActive",
            Self::Script(ScriptCommand::CallFunction { .. }) => "script.callFunction",
            Self::Session(SessionCommand::Status) => "session.status",
        }
    }
}

// ============================================================================
// Tabs Commands
// ============================================================================

/// Tabs module commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum TabsCommand {
    /// Active tab of the current window.
    ///
    /// Result: `{ "tabId": number | null, "url"?: string }`.
    #[serde(rename = "tabs.queryActive")]
    QueryActive,
}

// ============================================================================
// Script Commands
// ============================================================================

/// Script module commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ScriptCommand {
    /// Call a function declaration in the target tab's page context.
    ///
    /// Result: `{ "value": any }`.
    #[serde(rename = "script.callFunction")]
    CallFunction {
        /// Complete JavaScript function declaration.
        #[serde(rename = "functionDeclaration")]
        function_declaration: String,
        /// Positional arguments, passed as plain JSON.
        args: Vec<Value>,
    },
}

// ============================================================================
// Session Commands
// ============================================================================

/// Session module commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum SessionCommand {
    /// Liveness check.
    #[serde(rename = "session.status")]
    Status,
}

// ============================================================================
// Tests
// ============================================================================
