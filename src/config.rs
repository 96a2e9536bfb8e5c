//! Configuration for the Avast client
//!
//! Centralized connection policy with sensible defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the Avast daemon's Unix socket
pub const DEFAULT_SOCKET: &str = "/var/run/avast/scan.sock";

/// Default connect timeout (15 seconds)
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default per-command I/O timeout (60 seconds)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Default sleep between dial retries (1 second)
pub const DEFAULT_RETRY_SLEEP: Duration = Duration::from_secs(1);

/// Connection policy for a [`Client`](crate::Client)
///
/// [`Client`]: crate::Client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Filesystem path of the daemon's Unix socket
    pub socket_path: PathBuf,

    // -------------------------------------------------------------------------
    // Timeout Configuration
    // -------------------------------------------------------------------------
    /// Dial/handshake timeout
    pub connect_timeout: Duration,

    /// Per-command I/O deadline, covering every read and write of a
    /// single round-trip. Cleared between commands so idle time is
    /// not bounded.
    pub command_timeout: Duration,

    // -------------------------------------------------------------------------
    // Retry Configuration
    // -------------------------------------------------------------------------
    /// How many times a timeout-classified dial failure is retried.
    /// Only dial timeouts are retried; all other errors are fatal.
    pub connect_retries: u32,

    /// Sleep between dial retries
    pub retry_sleep: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            connect_retries: 0,
            retry_sleep: DEFAULT_RETRY_SLEEP,
        }
    }
}

impl ClientConfig {
    /// Create a config targeting the given socket path, with defaults
    /// for everything else
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the daemon socket path
    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.socket_path = path.into();
        self
    }

    /// Set the dial/handshake timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the per-command I/O timeout
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.config.command_timeout = timeout;
        self
    }

    /// Set the number of dial retries on timeout
    pub fn connect_retries(mut self, retries: u32) -> Self {
        self.config.connect_retries = retries;
        self
    }

    /// Set the sleep between dial retries
    pub fn retry_sleep(mut self, sleep: Duration) -> Self {
        self.config.retry_sleep = sleep;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
