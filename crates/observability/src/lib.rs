//! Logging setup shared by host applications.
//!
//! The library crates only emit `tracing` events; a host calls [`init`] once
//! at startup to get them on stderr.

pub mod tracing;

pub use tracing::{LogFormat, init, init_with};
