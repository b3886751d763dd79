//! Live connection to the browser extension.
//!
//! A [`Session`] owns the WebSocket connection accepted from the extension
//! and implements [`PageHost`] on top of it, so the scanner and filler can
//! run against a real tab.
//!
//! # Example
//!
//! ```no_run
//! use formexpo::{Session, page};
//!
//! # async fn example() -> formexpo::Result<()> {
//! let config = Session::builder().build()?;
//! let pending = Session::listen(config).await?;
//! println!("waiting for the extension on {}", pending.ws_url());
//!
//! let session = pending.accept().await?;
//! let (_tab, forms) = page::scan_active(&session).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, trace};
use url::Url;

use crate::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, TracingSink};
use crate::error::{Error, Result};
use crate::identifiers::{SessionId, TabId};
use crate::page::{ActiveTab, PageHost};
use crate::protocol::{
    Command, Event, Notification, ParsedEvent, Request, Response, ScriptCommand, SessionCommand,
    TabsCommand,
};
use crate::transport::{Connection, PendingServer};

use super::builder::{SessionBuilder, SessionConfig};

// ============================================================================
// PendingSession
// ============================================================================

/// A bound server waiting for the extension to connect.
pub struct PendingSession {
    server: PendingServer,
    config: SessionConfig,
}

impl PendingSession {
    /// WebSocket URL the extension should connect to.
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        self.server.ws_url()
    }

    /// Port actually bound.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.server.port()
    }

    /// Waits for the extension and completes the READY handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if the extension doesn't connect in time
    /// - [`Error::Connection`] if the WebSocket upgrade fails
    /// - [`Error::Protocol`] if the handshake is rejected
    pub async fn accept(self) -> Result<Session> {
        let (connection, ready) = self.server.accept(self.config.connect_timeout).await?;

        connection.set_event_handler(Box::new(handle_event));

        info!(
            session_id = %ready.session_id,
            user_agent = ready.user_agent.as_deref().unwrap_or("unknown"),
            "Extension connected"
        );

        Ok(Session {
            inner: Arc::new(SessionInner {
                connection,
                session_id: ready.session_id,
                user_agent: ready.user_agent,
                config: self.config,
            }),
        })
    }
}

// ============================================================================
// Session
// ============================================================================

/// Internal shared state for a session.
struct SessionInner {
    connection: Connection,
    session_id: SessionId,
    user_agent: Option<String>,
    config: SessionConfig,
}

/// A connected extension.
///
/// Cheap to clone; clones share the connection.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.inner.session_id)
            .field("user_agent", &self.inner.user_agent)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Binds the WebSocket server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the address cannot be bound.
    pub async fn listen(config: SessionConfig) -> Result<PendingSession> {
        let server = PendingServer::bind(config.ip, config.port).await?;
        info!(url = %server.ws_url(), "Waiting for extension");
        Ok(PendingSession { server, config })
    }

    /// Session ID reported by the extension.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.inner.session_id
    }

    /// Browser user agent, if reported.
    #[inline]
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.inner.user_agent.as_deref()
    }

    /// Directory exports are written to.
    #[inline]
    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.inner.config.download_dir
    }

    /// Diagnostics handle that mirrors messages into tracing and forwards
    /// them to the extension's background console.
    #[must_use]
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new(RemoteLogSink {
            connection: self.inner.connection.clone(),
        })
    }

    /// Asks the extension whether it is healthy.
    ///
    /// # Errors
    ///
    /// Returns transport errors or [`Error::Protocol`] on an error response.
    pub async fn status(&self) -> Result<bool> {
        let response = self
            .send_command(None, Command::Session(SessionCommand::Status))
            .await?;
        let ok = response.get_bool("ok");
        response.into_result()?;
        Ok(ok)
    }

    /// Closes the connection.
    pub fn close(&self) {
        debug!(session_id = %self.inner.session_id, "Closing session");
        self.inner.connection.shutdown();
    }

    /// Sends a command bounded by the configured command timeout.
    async fn send_command(&self, tab_id: Option<TabId>, command: Command) -> Result<Response> {
        let request = match tab_id {
            Some(tab_id) => Request::for_tab(tab_id, command),
            None => Request::new(command),
        };
        self.inner
            .connection
            .send_with_timeout(request, self.inner.config.command_timeout)
            .await
    }
}

// ============================================================================
// PageHost
// ============================================================================

#[async_trait]
impl PageHost for Session {
    async fn active_tab(&self) -> Result<ActiveTab> {
        let response = self
            .send_command(None, Command::Tabs(TabsCommand::QueryActive))
            .await?;
        let result = response.into_result()?;

        let tab_id = result
            .get("tabId")
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
            .and_then(TabId::new)
            .ok_or(Error::TabUnavailable)?;

        let url = result
            .get("url")
            .and_then(Value::as_str)
            .and_then(|raw| match Url::parse(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    debug!(url = raw, error = %e, "Ignoring unparsable tab URL");
                    None
                }
            });

        debug!(%tab_id, url = ?url.as_ref().map(Url::as_str), "Active tab resolved");
        Ok(ActiveTab { tab_id, url })
    }

    async fn call_function(
        &self,
        tab_id: TabId,
        function_declaration: &str,
        args: Vec<Value>,
    ) -> Result<Value> {
        trace!(%tab_id, args = args.len(), "Calling page function");

        let command = Command::Script(ScriptCommand::CallFunction {
            function_declaration: function_declaration.to_string(),
            args,
        });
        let response = self.send_command(Some(tab_id), command).await?;

        if response.is_error() {
            return Err(Error::injection_failed(response.error_message()));
        }

        Ok(response
            .result
            .as_ref()
            .and_then(|v| v.get("value"))
            .cloned()
            .unwrap_or(Value::Null))
    }
}

// ============================================================================
// RemoteLogSink
// ============================================================================

/// Sends diagnostics to the extension as `session.log` notifications and
/// mirrors them into tracing.
#[derive(Clone)]
pub struct RemoteLogSink {
    connection: Connection,
}

impl DiagnosticSink for RemoteLogSink {
    fn emit(&self, diagnostic: Diagnostic) {
        TracingSink.emit(diagnostic.clone());
        self.connection.notify(Notification::Log(diagnostic));
    }
}

// ============================================================================
// Event Handling
// ============================================================================

/// Routes events from the extension into tracing.
fn handle_event(event: Event) {
    let parsed = event.parse();
    let load_complete = parsed.is_load_complete();

    match parsed {
        ParsedEvent::TabUpdated {
            tab_id,
            url,
            status,
        } => {
            if load_complete {
                info!(tab_id, url = %url, "Tab updated");
            } else {
                trace!(tab_id, status = %status, "Tab loading");
            }
        }

        ParsedEvent::Log(diagnostic) => {
            debug!(source = "extension", "Remote diagnostic");
            TracingSink.emit(diagnostic);
        }

        ParsedEvent::Unknown { method, .. } => {
            debug!(method = %method, "Unhandled event");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
