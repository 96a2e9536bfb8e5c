//! Protocol Module
//!
//! Defines the daemon's line-oriented text protocol.
//!
//! ## Wire Format (newline-delimited over a Unix stream socket)
//!
//! ### Request
//! ```text
//! <VERB>[ <argument>]
//! ```
//!
//! ### Simple Response
//! ```text
//! 210 <VERB> DATA        (opening)
//! <VERB> <payload>       (exactly one payload line)
//! 200 <VERB> OK          (closing)
//! ```
//! EXCLUDE may fold the closing line into the payload slot when nothing is
//! excluded; CHECKURL answers with a single bare line; QUIT has no response
//! the client waits for.
//!
//! ### Streaming SCAN Response
//! ```text
//! 210 SCAN DATA
//! SCAN <name>\t[<status>]<depth>.<sub>[\t<signature>]   (zero or more)
//! 200 SCAN OK
//! ```
//! Status tokens: `+` clean, `L` infected, `E` error.

mod command;
mod options;
mod response;

pub use command::Command;
pub use options::{Flag, PackOption, SensiOption, Toggle};
pub use response::{
    expect_code, parse_scan_line, strip_code, strip_verb, vps_version, ScanResult, ScanStatus,
    EXCLUDE_OK, GREETING, REQUEST_ACCEPTED, REQUEST_COMPLETED, SCAN_COMPLETED, URL_BLOCKED,
};
