//! Connection Manager
//!
//! Owns the Unix-socket connection to the daemon: dialing with bounded
//! retry, the greeting handshake, per-command I/O deadlines, and line I/O.

use std::io::{self, BufRead, BufReader, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::thread;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{AvastError, Result};
use crate::protocol::{self, Command};

/// A live, exclusive connection to the daemon
///
/// Exactly one command round-trip may be in flight at a time; the owning
/// [`Client`](crate::Client) enforces this by holding a lock across the
/// full request/response exchange.
#[derive(Debug)]
pub struct Connection {
    /// Write side of the socket
    stream: UnixStream,

    /// Buffered read side (over a cloned handle of the same socket)
    reader: BufReader<UnixStream>,

    /// Deadline applied to every read and write of one command round-trip
    command_timeout: Duration,
}

impl Connection {
    /// Open a connection per the given policy
    ///
    /// Fails fast with [`AvastError::SocketMissing`] when the socket path
    /// does not exist, before any dial attempt. Dial failures classified
    /// as timeouts are retried up to the configured count with the
    /// configured sleep in between; any other dial error is fatal
    /// immediately. The daemon's greeting line must carry code 220 and is
    /// read under a deadline bounded by the connect timeout.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        if !config.socket_path.exists() {
            return Err(AvastError::SocketMissing(config.socket_path.clone()));
        }

        let stream = Self::dial(config)?;
        let reader = BufReader::new(stream.try_clone()?);
        let mut conn = Self {
            stream,
            reader,
            command_timeout: config.command_timeout,
        };

        // Greeting handshake, bounded by the connect timeout
        let _deadline = conn.deadline(config.connect_timeout)?;
        let greeting = conn.read_line()?;
        protocol::expect_code(&greeting, protocol::GREETING)?;

        tracing::debug!(
            "Connected to daemon at {}: {}",
            config.socket_path.display(),
            greeting
        );

        Ok(conn)
    }

    /// Dial the socket, retrying timeout-classified failures only
    fn dial(config: &ClientConfig) -> Result<UnixStream> {
        let mut attempt = 0;
        loop {
            match UnixStream::connect(&config.socket_path) {
                Ok(stream) => return Ok(stream),
                Err(e) if is_timeout(&e) && attempt < config.connect_retries => {
                    attempt += 1;
                    tracing::debug!(
                        "Dial timed out, retrying ({}/{})",
                        attempt,
                        config.connect_retries
                    );
                    thread::sleep(config.retry_sleep);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Update the per-command I/O timeout
    pub fn set_command_timeout(&mut self, timeout: Duration) {
        self.command_timeout = timeout;
    }

    /// Arm the per-command deadline for one round-trip
    ///
    /// The returned guard clears the deadline when dropped, on every exit
    /// path, so idle periods between commands are unbounded.
    pub fn command_deadline(&self) -> Result<DeadlineGuard> {
        self.deadline(self.command_timeout)
    }

    /// Arm a deadline on both directions of the socket
    fn deadline(&self, timeout: Duration) -> Result<DeadlineGuard> {
        // The clone shares the underlying socket, so timeout options set
        // through it apply to the reader handle as well.
        let stream = self.stream.try_clone()?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        Ok(DeadlineGuard { stream })
    }

    /// Write one request line: `"<VERB>[ <argument>]\n"`
    pub fn write_request(&mut self, cmd: Command, arg: Option<&str>) -> Result<()> {
        let line = match arg {
            Some(arg) => format!("{} {}\n", cmd, arg),
            None => format!("{}\n", cmd),
        };
        tracing::trace!("-> {}", line.trim_end());
        self.stream.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Read one response line, with the trailing newline (and any carriage
    /// return) stripped
    ///
    /// A clean EOF from the daemon surfaces as an `UnexpectedEof` I/O error:
    /// the protocol never ends a response stream by closing the socket.
    pub fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        if n == 0 {
            return Err(AvastError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by daemon",
            )));
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        tracing::trace!("<- {}", line);
        Ok(line)
    }

    /// Close both directions of the socket
    pub fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown(Shutdown::Both)?;
        Ok(())
    }
}

/// Scoped I/O deadline
///
/// Holds a cloned handle of the connection's socket with read and write
/// timeouts armed; dropping it disarms them again. Disarm failures are
/// ignored, the next guard re-arms from scratch anyway.
pub struct DeadlineGuard {
    stream: UnixStream,
}

impl Drop for DeadlineGuard {
    fn drop(&mut self) {
        let _ = self.stream.set_read_timeout(None);
        let _ = self.stream.set_write_timeout(None);
    }
}

/// Whether an I/O error is a timeout for dial-retry purposes
fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
