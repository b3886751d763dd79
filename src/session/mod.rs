//! Extension session management.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | Fluent configuration with validation |
//! | `core` | Connected session implementing [`PageHost`](crate::page::PageHost) |

// ============================================================================
// Submodules
// ============================================================================

/// Session configuration builder.
pub mod builder;

/// Connected session.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT, SessionBuilder, SessionConfig};
pub use core::{PendingSession, RemoteLogSink, Session};
