//! # avast-client
//!
//! Client for the Avast antivirus scanning daemon's line-oriented text
//! protocol, spoken over a local Unix stream socket:
//! - One connection per client, reused across commands
//! - Fully serialized round-trips (no pipelining, no interleaving)
//! - Bounded dial retry and per-command I/O deadlines
//! - Streaming SCAN response parsing with soft-error recovery
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                               │
//! │        (one method per verb, mutex-serialized)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │ Connection  │
//!   │ (vocabulary │          │ (dial/retry │
//!   │  + parsing) │          │  deadlines) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ Unix socket │
//!                           │  (daemon)   │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use avast_client::Client;
//!
//! fn main() -> avast_client::Result<()> {
//!     let client = Client::connect_default()?;
//!     for result in client.scan("/var/spool/mail")? {
//!         if result.infected {
//!             println!("{}: {:?}", result.filename, result.signature);
//!         }
//!     }
//!     client.close()
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AvastError, Result};
pub use config::{ClientConfig, DEFAULT_SOCKET};
pub use client::Client;
pub use protocol::{Command, Flag, PackOption, ScanResult, ScanStatus, SensiOption, Toggle};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of avast-client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
