//! Service modules for the scan pipeline
//!
//! - `classifier`: recognizer output → typed query
//! - `catalog_client`: book catalog search API
//! - `resolver`: candidate selection and normalization
//! - `sheet_appender`: external append log

pub mod catalog_client;
pub mod classifier;
pub mod resolver;
pub mod sheet_appender;

pub use catalog_client::{BookCatalog, CatalogError, GoogleBooksClient};
pub use classifier::IdentifierClassifier;
pub use resolver::{MetadataResolver, CANDIDATE_WINDOW};
pub use sheet_appender::{
    append_log_from_config, AppendLog, AppendOutcome, DisabledAppendLog, SheetAppender,
};
