//! # shelfscan common library
//!
//! Shared code for the shelfscan workspace:
//! - Error type used by configuration and I/O helpers
//! - TOML configuration loading and path resolution
//! - Scan events (EventBus) and the single-line status channel

pub mod config;
pub mod error;
pub mod events;
pub mod status;

pub use error::{Error, Result};
pub use events::{EventBus, ScanEvent, ScanState};
pub use status::StatusLine;
