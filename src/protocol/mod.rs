//! WebSocket protocol message types.
//!
//! This module defines the message format for communication between
//! local end (Rust) and remote end (Extension).
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Local → Remote | Command request |
//! | `Response` | Remote → Local | Command response |
//! | `Notification` | Local → Remote | One-way message, never answered |
//! | `Event` | Remote → Local | Browser notification |
//!
//! # Command Naming
//!
//! Commands follow `module.methodName` format:
//!
//! - `tabs.queryActive`
//! - `script.callFunction`
//! - `session.status`
//!
//! Notifications use the same naming (`session.log`) but carry no `id`.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Command definitions by domain |
//! | `event` | Event types |
//! | `request` | Request, Response, and Notification types |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by module.
pub mod command;

/// Event message types.
pub mod event;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, ScriptCommand, SessionCommand, TabsCommand};
pub use event::{Event, ParsedEvent};
pub use request::{Notification, Request, Response, ResponseType};
