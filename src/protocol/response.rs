//! Response parsing
//!
//! Status-code line validation, payload decoding for the simple commands,
//! and the structured parser for streaming SCAN result lines.

use crate::error::{AvastError, Result};

use super::Command;

// =============================================================================
// Status Codes & Sentinels
// =============================================================================

/// Code of the greeting line sent by the daemon on connect
pub const GREETING: u16 = 220;

/// Code of the opening line acknowledging a request
pub const REQUEST_ACCEPTED: u16 = 210;

/// Code of the closing line completing a request
pub const REQUEST_COMPLETED: u16 = 200;

/// Terminator line of a streaming SCAN response
pub const SCAN_COMPLETED: &str = "200 SCAN OK";

/// Payload sentinel meaning no exclusion is currently set
pub const EXCLUDE_OK: &str = "EXCLUDE OK";

/// Suffix of a CHECKURL response line for a blocked URL
pub const URL_BLOCKED: &str = "URL blocked";

// =============================================================================
// Code Lines & Payload Prefixes
// =============================================================================

/// Validate that a line carries the expected numeric status code
///
/// The code is the leading space-delimited token. Any mismatch, including
/// an unparseable token, surfaces the raw line.
pub fn expect_code(line: &str, expected: u16) -> Result<()> {
    let token = line.split(' ').next().unwrap_or("");
    match token.parse::<u16>() {
        Ok(code) if code == expected => Ok(()),
        _ => Err(AvastError::UnexpectedCode {
            expected,
            line: line.to_string(),
        }),
    }
}

/// Strip a leading `"<code> "` from a line, if present
///
/// Used to recognize an EXCLUDE payload line that folds the closing status
/// into itself (`"200 EXCLUDE OK"`).
pub fn strip_code(line: &str, code: u16) -> Option<&str> {
    line.strip_prefix(&format!("{} ", code))
}

/// Strip a command's wire token (plus the separating space) from a payload
///
/// Returns `None` when the payload is not prefixed by the token.
pub fn strip_verb(payload: &str, cmd: Command) -> Option<&str> {
    let rest = payload.strip_prefix(cmd.as_str())?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix(' ')
    }
}

/// Decode a VPS payload (`"VPS 190918-0"`) into the definitions version
///
/// The version is the integer before the optional dashed build suffix.
/// A missing prefix or non-numeric remainder is an invalid response.
pub fn vps_version(payload: &str) -> Result<u32> {
    let invalid = || AvastError::InvalidResponse(payload.to_string());

    let rest = strip_verb(payload, Command::Vps).ok_or_else(invalid)?;
    let version = rest.split('-').next().unwrap_or("");

    version.parse::<u32>().map_err(|_| invalid())
}

// =============================================================================
// SCAN Results
// =============================================================================

/// Per-file verdict token emitted by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// `+` — file is clean
    Clean,
    /// `L` — file is infected
    Infected,
    /// `E` — file could not be scanned
    Error,
}

impl ScanStatus {
    /// Parse the single-letter wire token
    pub fn from_token(token: char) -> Option<Self> {
        match token {
            '+' => Some(ScanStatus::Clean),
            'L' => Some(ScanStatus::Infected),
            'E' => Some(ScanStatus::Error),
            _ => None,
        }
    }

    /// The single-letter wire token
    pub fn as_char(&self) -> char {
        match self {
            ScanStatus::Clean => '+',
            ScanStatus::Infected => 'L',
            ScanStatus::Error => 'E',
        }
    }
}

/// One entry of a streaming SCAN response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Path of the scanned file (the container path for archive members)
    pub filename: String,

    /// Path of the member inside a container file, when the reported item
    /// is not a top-level file
    pub archive_item: Option<String>,

    /// Verdict for this entry
    pub status: ScanStatus,

    /// Whether the entry is infected (true iff status is [`ScanStatus::Infected`])
    pub infected: bool,

    /// Signature name for infected entries, with the daemon's numeric
    /// prefix stripped
    pub signature: Option<String>,

    /// The unparsed line as received, kept for diagnostics
    pub raw: String,
}

/// Parse one SCAN result line
///
/// Expected shape: `SCAN <name>\t[<status>]<depth>.<sub>[\t<signature>]`
/// where `<name>` splits on the first `|` into container and archive
/// member only when the nesting depth is non-zero.
pub fn parse_scan_line(line: &str) -> Result<ScanResult> {
    let malformed = || AvastError::InvalidResponse(line.to_string());

    let rest = strip_verb(line, Command::Scan).ok_or_else(malformed)?;
    let mut fields = rest.split('\t');

    let name = fields.next().filter(|f| !f.is_empty()).ok_or_else(malformed)?;
    let verdict = fields.next().ok_or_else(malformed)?;
    let signature_field = fields.next().filter(|f| !f.is_empty());

    // Verdict field: "[X]<depth>.<sub>"
    let body = verdict.strip_prefix('[').ok_or_else(malformed)?;
    let (token, depths) = body.split_once(']').ok_or_else(malformed)?;
    let mut token_chars = token.chars();
    let status = token_chars
        .next()
        .filter(|_| token_chars.next().is_none())
        .and_then(ScanStatus::from_token)
        .ok_or_else(malformed)?;

    let (depth, sub) = depths.split_once('.').ok_or_else(malformed)?;
    let depth: u32 = depth.parse().map_err(|_| malformed())?;
    let _: u32 = sub.parse().map_err(|_| malformed())?;

    // The pipe separator is only meaningful for nested items; a top-level
    // filename keeps any literal pipe characters.
    let (filename, archive_item) = if depth > 0 {
        match name.split_once('|') {
            Some((container, member)) => (container.to_string(), Some(member.to_string())),
            None => (name.to_string(), None),
        }
    } else {
        (name.to_string(), None)
    };

    let infected = status == ScanStatus::Infected;
    let signature = if infected {
        signature_field.map(|s| strip_signature_prefix(s).to_string())
    } else {
        None
    };

    Ok(ScanResult {
        filename,
        archive_item,
        status,
        infected,
        signature,
        raw: line.to_string(),
    })
}

/// Strip the daemon's `"<digits> "` prefix from a signature name, when present
fn strip_signature_prefix(signature: &str) -> &str {
    let rest = signature.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < signature.len() {
        if let Some(stripped) = rest.strip_prefix(' ') {
            return stripped;
        }
    }
    signature
}
