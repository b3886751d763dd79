//! WebSocket transport layer.
//!
//! This module handles communication between local end (Rust) and
//! remote end (browser extension) via WebSocket.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Session (Rust) │                              │  Extension      │
//! │                 │         WebSocket            │  (Background)   │
//! │  PendingServer  │◄────────────────────────────►│                 │
//! │  → Connection   │      127.0.0.1:7878          │  WebSocket      │
//! │                 │                              │  Client         │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `PendingServer::bind` - Bind to the configured address
//! 2. The extension connects to the advertised WebSocket URL
//! 3. `PendingServer::accept` - Upgrade and wait for READY
//! 4. `Connection` - Send commands and notifications, receive responses/events
//! 5. `Connection::shutdown` - Close the connection
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |
//! | `server` | WebSocket server binding and acceptance |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// WebSocket server for the extension.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, DEFAULT_COMMAND_TIMEOUT, EventHandler, ReadyData};
pub use server::PendingServer;
