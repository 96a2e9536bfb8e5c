//! Network Module
//!
//! Unix-socket connection handling.
//!
//! ## Architecture
//! - One socket, one buffered reader per client
//! - Dial-time retry on timeout only
//! - Scoped per-command I/O deadlines

mod connection;

pub use connection::{Connection, DeadlineGuard};
