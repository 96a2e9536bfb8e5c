//! Command definitions
//!
//! The closed set of request verbs the daemon understands.

use std::fmt;

/// A protocol request verb
///
/// Each verb has one canonical uppercase wire token. The token doubles as
/// the prefix of the matching response payload, so [`token_len`] is used
/// when slicing a payload down to its remainder.
///
/// [`token_len`]: Command::token_len
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Submit a path for scanning
    Scan,
    /// Query the virus definitions version
    Vps,
    /// Get or set packer options
    Pack,
    /// Get or set scan flags
    Flags,
    /// Get or set scan sensitivity
    Sensitivity,
    /// Get or set the scan exclusion path
    Exclude,
    /// Check whether a URL is blocked
    CheckUrl,
    /// Terminate the session
    Quit,
}

impl Command {
    /// The canonical uppercase wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Scan => "SCAN",
            Command::Vps => "VPS",
            Command::Pack => "PACK",
            Command::Flags => "FLAGS",
            Command::Sensitivity => "SENSITIVITY",
            Command::Exclude => "EXCLUDE",
            Command::CheckUrl => "CHECKURL",
            Command::Quit => "QUIT",
        }
    }

    /// Length of the wire token in bytes
    pub fn token_len(&self) -> usize {
        self.as_str().len()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
