//! Error types for the Avast client
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using AvastError
pub type Result<T> = std::result::Result<T, AvastError>;

/// Unified error type for Avast client operations
#[derive(Debug, Error)]
pub enum AvastError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    /// The configured socket path does not exist on the filesystem.
    /// Raised before any dial attempt.
    #[error("The unix socket: {} does not exist", .0.display())]
    SocketMissing(PathBuf),

    /// Dial or read/write failure, including an exceeded I/O deadline.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// An expected status-code line did not carry the expected code.
    #[error("Unexpected response code: expected {expected}, got {line:?}")]
    UnexpectedCode { expected: u16, line: String },

    /// A payload line failed structural parsing (VPS version remainder,
    /// SCAN result lines, missing verb prefixes).
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),
}

impl AvastError {
    /// Whether this error is a transport-level timeout.
    ///
    /// After a timeout the connection is unusable for further commands;
    /// callers should discard the client and create a new one.
    pub fn is_timeout(&self) -> bool {
        match self {
            AvastError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}
