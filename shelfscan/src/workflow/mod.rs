//! Scan workflow
//!
//! - `orchestrator`: per-attempt state machine
//! - `session`: interactive command parsing

pub mod orchestrator;
pub mod session;

pub use orchestrator::{Orchestrator, ScanMode, ScanOutcome, ScanReport};
pub use session::SessionCommand;
