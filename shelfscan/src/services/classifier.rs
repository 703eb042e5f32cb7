//! Identifier classification
//!
//! Turns recognizer output into a typed [`Query`]:
//! - barcode payloads must carry a Bookland prefix (978/979)
//! - OCR'd ISBN digits are validated strictly or leniently per config
//! - OCR'd titles and manual entries pass through when non-empty

use crate::error::{ScanError, ScanResult};
use crate::models::{IdentifierSource, Query, RecognitionResult};
use once_cell::sync::Lazy;
use regex::Regex;
use shelfscan_common::config::IsbnValidation;
use tracing::debug;

/// Bookland (ISBN-13) GS1 prefixes
const BOOKLAND_PREFIXES: [&str; 2] = ["978", "979"];

/// Minimum digit run accepted by lenient validation
const LENIENT_MIN_DIGITS: usize = 10;

/// ISBN-13 alternative first so it wins at the same start position
static ISBN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"97[89][0-9]{10}|[0-9]{9}[0-9X]").expect("static ISBN pattern"));

#[derive(Debug, Clone, Default)]
pub struct IdentifierClassifier {
    isbn_validation: IsbnValidation,
}

impl IdentifierClassifier {
    pub fn new(isbn_validation: IsbnValidation) -> Self {
        Self { isbn_validation }
    }

    pub fn isbn_validation(&self) -> IsbnValidation {
        self.isbn_validation
    }

    /// Classify recognizer output from the given source
    pub fn classify(
        &self,
        result: &RecognitionResult,
        source: IdentifierSource,
    ) -> ScanResult<Query> {
        let text = result.text();
        let query = match source {
            IdentifierSource::Barcode => classify_barcode(text),
            IdentifierSource::IsbnText => match self.isbn_validation {
                IsbnValidation::Strict => extract_isbn_strict(text),
                IsbnValidation::Lenient => extract_isbn_lenient(text),
            }
            .and_then(Query::isbn),
            IdentifierSource::TitleText | IdentifierSource::Manual => Query::title(text.trim()),
        };

        match query {
            Some(query) => {
                debug!(source = %source, query = %query, "Identifier classified");
                Ok(query)
            }
            None => Err(ScanError::ClassificationFailure {
                origin: source,
                text: text.to_string(),
            }),
        }
    }

    /// Manual title entry; empty input is a validation error for the user
    pub fn manual_query(&self, input: &str) -> ScanResult<Query> {
        Query::title(input.trim()).ok_or(ScanError::EmptyManualEntry)
    }
}

fn classify_barcode(text: &str) -> Option<Query> {
    let code = text.trim();
    if BOOKLAND_PREFIXES.iter().any(|p| code.starts_with(p)) {
        Query::isbn(code)
    } else {
        None
    }
}

/// Keep digits and `X`, then take the first ISBN-13 or ISBN-10 run
pub fn extract_isbn_strict(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X')
        .collect();
    ISBN_PATTERN.find(&cleaned).map(|m| m.as_str().to_string())
}

/// Keep digits only; accept when at least 10 remain
pub fn extract_isbn_lenient(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= LENIENT_MIN_DIGITS {
        Some(digits)
    } else {
        None
    }
}
