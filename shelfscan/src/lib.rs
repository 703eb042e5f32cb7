//! shelfscan library interface
//!
//! Turns a camera frame into a catalogued book:
//! capture → (grayscale) → barcode/OCR → classify → catalog search →
//! candidate selection → display + spreadsheet append.
//!
//! Exposes public APIs for the binary and for integration testing.

pub mod capture;
pub mod config;
pub mod error;
pub mod models;
pub mod presenter;
pub mod recognizers;
pub mod services;
pub mod tools;
pub mod workflow;

pub use crate::error::{ScanError, ScanResult};
pub use crate::models::{CanonicalBook, Query, QueryKind, RawCapture, RecognitionResult};
pub use crate::workflow::{Orchestrator, ScanMode, ScanOutcome, ScanReport};
