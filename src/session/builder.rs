//! Builder pattern for session configuration.
//!
//! Provides a fluent API for configuring and creating a [`SessionConfig`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use formexpo::Session;
//!
//! # fn example() -> formexpo::Result<()> {
//! let config = Session::builder()
//!     .port(7979)
//!     .command_timeout(Duration::from_secs(10))
//!     .download_dir("/tmp/exports")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::exporter;
use crate::transport::DEFAULT_COMMAND_TIMEOUT;

// ============================================================================
// Constants
// ============================================================================

/// Port the extension connects to unless configured otherwise.
pub const DEFAULT_PORT: u16 = 7878;

/// Default wait for the extension to connect and send READY.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SessionConfig
// ============================================================================

/// Validated session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Address the WebSocket server binds to.
    pub ip: IpAddr,
    /// Port the WebSocket server binds to (0 for random).
    pub port: u16,
    /// Bound on waiting for the extension to connect.
    pub connect_timeout: Duration,
    /// Bound on each command round trip.
    pub command_timeout: Duration,
    /// Directory exports are written to.
    pub download_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            download_dir: exporter::default_download_dir(),
        }
    }
}

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for configuring a session.
///
/// Use [`Session::builder()`](super::Session::builder) to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct SessionBuilder {
    /// Bind address.
    ip: Option<IpAddr>,
    /// Bind port.
    port: Option<u16>,
    /// Connect timeout.
    connect_timeout: Option<Duration>,
    /// Command timeout.
    command_timeout: Option<Duration>,
    /// Export directory.
    download_dir: Option<PathBuf>,
}

// ============================================================================
// SessionBuilder Implementation
// ============================================================================

impl SessionBuilder {
    /// Creates a new builder with no overrides.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the address the WebSocket server binds to.
    #[inline]
    #[must_use]
    pub fn ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    /// Sets the port the WebSocket server binds to.
    ///
    /// Port 0 lets the OS pick one; the extension must then be told the
    /// resulting URL.
    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets how long to wait for the extension to connect.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets how long to wait for each command response.
    #[inline]
    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Sets the directory exports are written to.
    #[inline]
    #[must_use]
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if either timeout is zero
    /// - [`Error::Config`] if the download directory path is empty
    pub fn build(self) -> Result<SessionConfig> {
        let defaults = SessionConfig::default();

        let connect_timeout =
            Self::validate_timeout("connect", self.connect_timeout.unwrap_or(defaults.connect_timeout))?;
        let command_timeout =
            Self::validate_timeout("command", self.command_timeout.unwrap_or(defaults.command_timeout))?;
        let download_dir = self.validate_download_dir()?.unwrap_or(defaults.download_dir);

        Ok(SessionConfig {
            ip: self.ip.unwrap_or(defaults.ip),
            port: self.port.unwrap_or(defaults.port),
            connect_timeout,
            command_timeout,
            download_dir,
        })
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SessionBuilder {
    /// Rejects zero timeouts.
    fn validate_timeout(name: &str, timeout: Duration) -> Result<Duration> {
        if timeout.is_zero() {
            return Err(Error::config(format!(
                "The {name} timeout must be greater than zero."
            )));
        }
        Ok(timeout)
    }

    /// Rejects an explicitly empty download directory.
    fn validate_download_dir(&self) -> Result<Option<PathBuf>> {
        match &self.download_dir {
            Some(dir) if dir.as_os_str().is_empty() => Err(Error::config(
                "Download directory must not be empty.\n\
                 Example: Session::builder().download_dir(\"./exports\")",
            )),
            other => Ok(other.clone()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = SessionBuilder::new();
        assert!(builder.ip.is_none());
        assert!(builder.port.is_none());
        assert!(builder.download_dir.is_none());
    }

    #[test]
    fn test_build_uses_defaults() {
        let config = SessionBuilder::new().build().expect("build");
        assert_eq!(config.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.port, 7878);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.command_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_setters_override_defaults() {
        let config = SessionBuilder::new()
            .ip(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .port(0)
            .connect_timeout(Duration::from_secs(5))
            .command_timeout(Duration::from_millis(1500))
            .download_dir("/tmp/exports")
            .build()
            .expect("build");

        assert_eq!(config.ip, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.port, 0);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.command_timeout, Duration::from_millis(1500));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = SessionBuilder::new()
            .command_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config { ref message } if message.contains("command")));

        let err = SessionBuilder::new()
            .connect_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config { ref message } if message.contains("connect")));
    }

    #[test]
    fn test_empty_download_dir_rejected() {
        let err = SessionBuilder::new().download_dir("").build().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
