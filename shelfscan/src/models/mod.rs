//! Data model for one scan attempt
//!
//! `RawCapture` and `RecognitionResult` live only inside an attempt;
//! `Query` and `CanonicalBook` are attempt-scoped values handed to the
//! resolver and presenter.

pub mod book;
pub mod capture;
pub mod query;

pub use book::{
    CandidateRecord, CanonicalBook, ImageLinks, IndustryIdentifier, Volume, VolumesResponse,
    NO_DATA,
};
pub use capture::{RawCapture, RecognitionResult};
pub use query::{IdentifierSource, Query, QueryKind};
