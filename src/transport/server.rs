//! WebSocket server the extension connects to.
//!
//! # Connection Flow
//!
//! 1. Rust binds the WebSocket server (default `127.0.0.1:7878`)
//! 2. The extension's background page connects to the advertised URL
//! 3. The extension sends a READY message carrying its session ID
//! 4. Connection established, ready for commands

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::Connection;
use super::connection::ReadyData;

// ============================================================================
// PendingServer
// ============================================================================

/// A WebSocket server that is bound but not yet connected.
///
/// Represents the state between binding to a port and accepting
/// the extension's connection.
///
/// # Example
///
/// ```ignore
/// use std::net::{IpAddr, Ipv4Addr};
/// use std::time::Duration;
/// use formexpo::transport::PendingServer;
///
/// let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 7878).await?;
/// println!("waiting on {}", server.ws_url());
///
/// let (connection, ready) = server.accept(Duration::from_secs(30)).await?;
/// ```
pub struct PendingServer {
    /// TCP listener for incoming connections.
    listener: TcpListener,
    /// Address the server is bound to.
    addr: SocketAddr,
}

impl PendingServer {
    /// Binds a WebSocket server to the specified address and port.
    ///
    /// Use port 0 to let the OS assign a random available port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(ip, port)).await?;
        let addr = listener.local_addr()?;

        debug!(%addr, "WebSocket server bound");

        Ok(Self { listener, addr })
    }

    /// Returns the port the server is bound to.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Returns the local socket address.
    #[inline]
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the WebSocket URL for this server.
    ///
    /// Format: `ws://{ip}:{port}`
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Accepts a connection from the extension and completes the handshake.
    ///
    /// This method:
    /// 1. Waits for TCP connection (bounded by `connect_timeout`)
    /// 2. Upgrades to WebSocket
    /// 3. Waits for READY handshake message
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if the extension doesn't connect in time
    /// - [`Error::Connection`] if WebSocket upgrade fails
    /// - [`Error::Protocol`] if READY handshake fails
    pub async fn accept(self, connect_timeout: Duration) -> Result<(Connection, ReadyData)> {
        let timeout_ms = u64::try_from(connect_timeout.as_millis()).unwrap_or(u64::MAX);

        let (stream, peer) = timeout(connect_timeout, self.listener.accept())
            .await
            .map_err(|_| Error::connection_timeout(timeout_ms))??;

        debug!(%peer, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::connection(format!("WebSocket upgrade failed: {e}")))?;

        info!(addr = %self.addr, "WebSocket connection established");

        let connection = Connection::new(ws_stream);
        let ready_data = connection.wait_ready(connect_timeout).await?;

        Ok((connection, ready_data))
    }
}

// ============================================================================
// Tests
// ============================================================================
