//! Avast Client
//!
//! One public method per protocol verb, each composing a request from the
//! command vocabulary and option encoders, delegating to the connection
//! manager, and decoding via the response parser.

use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::ClientConfig;
use crate::error::{AvastError, Result};
use crate::network::Connection;
use crate::protocol::{self, Command, Flag, PackOption, ScanResult, SensiOption, Toggle};

/// A client session with the scanning daemon
///
/// Owns one connection, reused across command invocations. Round-trips are
/// fully serialized through an internal lock: responses always arrive in
/// the order commands were issued and concurrent callers can never
/// interleave bytes on the wire. The client is `Send + Sync`; share it via
/// `Arc` for concurrent use.
#[derive(Debug)]
pub struct Client {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    conn: Connection,
    config: ClientConfig,
}

impl Client {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Connect to the daemon at the given socket path with default policy
    pub fn connect(socket_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(ClientConfig::new(socket_path))
    }

    /// Connect to the daemon at the well-known default socket path
    pub fn connect_default() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Connect with an explicit policy
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let conn = Connection::open(&config)?;
        Ok(Self {
            inner: Mutex::new(Inner { conn, config }),
        })
    }

    // -------------------------------------------------------------------------
    // Policy Knobs
    // -------------------------------------------------------------------------

    /// Set the dial/handshake timeout; a zero duration is ignored
    pub fn set_conn_timeout(&self, timeout: Duration) {
        if timeout > Duration::ZERO {
            self.inner.lock().config.connect_timeout = timeout;
        }
    }

    /// Set the per-command I/O timeout; a zero duration is ignored
    pub fn set_cmd_timeout(&self, timeout: Duration) {
        if timeout > Duration::ZERO {
            let mut inner = self.inner.lock();
            inner.config.command_timeout = timeout;
            inner.conn.set_command_timeout(timeout);
        }
    }

    /// Set the number of times a dial timeout is retried
    pub fn set_conn_retries(&self, retries: u32) {
        self.inner.lock().config.connect_retries = retries;
    }

    /// Set the sleep between dial retries; a zero duration is ignored
    pub fn set_conn_sleep(&self, sleep: Duration) {
        if sleep > Duration::ZERO {
            self.inner.lock().config.retry_sleep = sleep;
        }
    }

    /// The socket path this client is connected to
    pub fn socket_path(&self) -> PathBuf {
        self.inner.lock().config.socket_path.clone()
    }

    /// The current dial/handshake timeout
    pub fn conn_timeout(&self) -> Duration {
        self.inner.lock().config.connect_timeout
    }

    /// The current per-command I/O timeout
    pub fn cmd_timeout(&self) -> Duration {
        self.inner.lock().config.command_timeout
    }

    /// The current dial retry count
    pub fn conn_retries(&self) -> u32 {
        self.inner.lock().config.connect_retries
    }

    /// The current sleep between dial retries
    pub fn conn_sleep(&self) -> Duration {
        self.inner.lock().config.retry_sleep
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Submit a file or directory for scanning
    ///
    /// Returns one result per reported file or archive member, in the
    /// order the daemon emits them. Malformed result lines do not abort
    /// the scan: the stream is drained to its terminator and the first
    /// malformed line is then surfaced as [`AvastError::InvalidResponse`],
    /// unless a transport error preempted it.
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<Vec<ScanResult>> {
        let mut inner = self.inner.lock();
        let conn = &mut inner.conn;

        let path = path.as_ref().to_string_lossy();
        let _deadline = conn.command_deadline()?;
        conn.write_request(Command::Scan, Some(&path))?;
        protocol::expect_code(&conn.read_line()?, protocol::REQUEST_ACCEPTED)?;

        let mut results = Vec::new();
        let mut soft_error: Option<AvastError> = None;

        loop {
            let line = conn.read_line()?;
            if line == protocol::SCAN_COMPLETED {
                break;
            }
            match protocol::parse_scan_line(&line) {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!("Malformed SCAN line: {}", line);
                    // Keep draining; the first malformed line wins.
                    if soft_error.is_none() {
                        soft_error = Some(e);
                    }
                }
            }
        }

        match soft_error {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }

    /// Query the virus definitions (VPS) version
    pub fn vps(&self) -> Result<u32> {
        let payload = self.basic_cmd(Command::Vps, None)?;
        protocol::vps_version(&payload)
    }

    /// Get the current packer options as reported by the daemon
    pub fn get_pack(&self) -> Result<String> {
        self.get_settings(Command::Pack)
    }

    /// Enable or disable a packer option
    pub fn set_pack(&self, option: PackOption, enable: bool) -> Result<()> {
        self.set_option(Command::Pack, &option, enable)
    }

    /// Get the current scan flags as reported by the daemon
    pub fn get_flags(&self) -> Result<String> {
        self.get_settings(Command::Flags)
    }

    /// Enable or disable a scan flag
    pub fn set_flags(&self, flag: Flag, enable: bool) -> Result<()> {
        self.set_option(Command::Flags, &flag, enable)
    }

    /// Get the current sensitivity settings as reported by the daemon
    pub fn get_sensitivity(&self) -> Result<String> {
        self.get_settings(Command::Sensitivity)
    }

    /// Enable or disable a sensitivity category
    pub fn set_sensitivity(&self, option: SensiOption, enable: bool) -> Result<()> {
        self.set_option(Command::Sensitivity, &option, enable)
    }

    /// Get the current exclusion path; empty when none is set
    pub fn get_exclude(&self) -> Result<String> {
        let payload = self.basic_cmd(Command::Exclude, None)?;
        if payload.is_empty() || payload == protocol::EXCLUDE_OK {
            return Ok(String::new());
        }
        match protocol::strip_verb(&payload, Command::Exclude) {
            Some(rest) => Ok(rest.to_string()),
            None => Err(AvastError::InvalidResponse(payload)),
        }
    }

    /// Exclude a path from scans
    pub fn set_exclude(&self, path: impl AsRef<Path>) -> Result<()> {
        self.basic_cmd(Command::Exclude, Some(&path.as_ref().to_string_lossy()))?;
        Ok(())
    }

    /// Check whether a URL is blocked
    ///
    /// The response is a single bare line; the URL is blocked iff the line
    /// ends with the daemon's blocked marker. Neither branch is an error.
    pub fn check_url(&self, url: &str) -> Result<bool> {
        let mut inner = self.inner.lock();
        let conn = &mut inner.conn;

        let _deadline = conn.command_deadline()?;
        conn.write_request(Command::CheckUrl, Some(url))?;
        let line = conn.read_line()?;

        Ok(line.ends_with(protocol::URL_BLOCKED))
    }

    /// End the session
    ///
    /// Sends QUIT best-effort and closes the socket unconditionally, even
    /// when QUIT failed; a QUIT error is still surfaced to the caller.
    pub fn close(self) -> Result<()> {
        let mut inner = self.inner.into_inner();
        let quit = Self::round_trip(&mut inner.conn, Command::Quit, None).map(|_| ());
        let shutdown = inner.conn.shutdown();
        quit.and(shutdown)
    }

    // -------------------------------------------------------------------------
    // Round-Trip Plumbing
    // -------------------------------------------------------------------------

    /// Lock the connection and run one simple command round-trip
    fn basic_cmd(&self, cmd: Command, arg: Option<&str>) -> Result<String> {
        let mut inner = self.inner.lock();
        Self::round_trip(&mut inner.conn, cmd, arg)
    }

    /// One simple command round-trip: request line, then the three-part
    /// envelope (opening 210, one payload line, closing 200)
    ///
    /// QUIT reads nothing back. An EXCLUDE payload line that already
    /// carries the closing code folds the envelope: the code is stripped
    /// and no third line is read.
    fn round_trip(conn: &mut Connection, cmd: Command, arg: Option<&str>) -> Result<String> {
        let _deadline = conn.command_deadline()?;
        conn.write_request(cmd, arg)?;

        if cmd == Command::Quit {
            return Ok(String::new());
        }

        protocol::expect_code(&conn.read_line()?, protocol::REQUEST_ACCEPTED)?;
        let payload = conn.read_line()?;

        if cmd == Command::Exclude {
            if let Some(folded) = protocol::strip_code(&payload, protocol::REQUEST_COMPLETED) {
                return Ok(folded.to_string());
            }
        }

        protocol::expect_code(&conn.read_line()?, protocol::REQUEST_COMPLETED)?;
        Ok(payload)
    }

    /// Fetch a settings string: the verb's payload with its token stripped
    fn get_settings(&self, cmd: Command) -> Result<String> {
        let payload = self.basic_cmd(cmd, None)?;
        match protocol::strip_verb(&payload, cmd) {
            Some(rest) => Ok(rest.to_string()),
            None => Err(AvastError::InvalidResponse(payload)),
        }
    }

    /// Send a verb with an option's `+name`/`-name` fragment as argument
    fn set_option(&self, cmd: Command, option: &dyn Toggle, enable: bool) -> Result<()> {
        let fragment = if enable {
            option.enable()
        } else {
            option.disable()
        };
        self.basic_cmd(cmd, Some(&fragment))?;
        Ok(())
    }
}
