//! Candidate selection and normalization
//!
//! Among the first [`CANDIDATE_WINDOW`] candidates, the first one with a
//! publisher wins; without any, the very first candidate is used. This is
//! a single greedy pass with early exit, not a scoring function.

use super::catalog_client::BookCatalog;
use crate::error::{ScanError, ScanResult};
use crate::models::{CandidateRecord, CanonicalBook, Query, NO_DATA};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of leading candidates inspected for a publisher
pub const CANDIDATE_WINDOW: usize = 5;

pub struct MetadataResolver {
    catalog: Arc<dyn BookCatalog>,
}

impl MetadataResolver {
    pub fn new(catalog: Arc<dyn BookCatalog>) -> Self {
        Self { catalog }
    }

    /// Search the catalog and reduce the result list to one book
    pub async fn resolve(&self, query: &Query) -> ScanResult<CanonicalBook> {
        let search_term = query.search_term();

        let candidates = self.catalog.search(&search_term).await.map_err(|e| {
            warn!(q = %search_term, error = %e, "Catalog search failed");
            ScanError::Transport(e.to_string())
        })?;

        let index = select_candidate(&candidates)
            .ok_or_else(|| ScanError::NoResultsFound(search_term.clone()))?;

        let book = normalize(&candidates[index]);

        info!(
            q = %search_term,
            selected = index,
            isbn = %book.isbn,
            title = %book.title,
            "Book resolved"
        );

        Ok(book)
    }
}

/// Index of the chosen candidate, `None` for an empty list
pub fn select_candidate(candidates: &[CandidateRecord]) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let chosen = candidates
        .iter()
        .take(CANDIDATE_WINDOW)
        .position(CandidateRecord::has_publisher)
        .unwrap_or(0);

    debug!(
        chosen,
        inspected = candidates.len().min(CANDIDATE_WINDOW),
        "Candidate selected"
    );

    Some(chosen)
}

/// Resolve every optional field to a value or [`NO_DATA`]
pub fn normalize(candidate: &CandidateRecord) -> CanonicalBook {
    let isbn = candidate
        .industry_identifiers
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|id| id.id_type.contains("ISBN"))
        .map(|id| id.identifier.as_str());

    CanonicalBook {
        isbn: or_no_data(isbn),
        title: or_no_data(candidate.title.as_deref()),
        authors: join_or_no_data(candidate.authors.as_deref()),
        publisher: or_no_data(candidate.publisher.as_deref()),
        description: or_no_data(candidate.description.as_deref()),
        categories: join_or_no_data(candidate.categories.as_deref()),
        image_url: or_no_data(
            candidate
                .image_links
                .as_ref()
                .and_then(|links| links.thumbnail.as_deref()),
        ),
        preview_link: or_no_data(candidate.preview_link.as_deref()),
    }
}

fn or_no_data(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NO_DATA.to_string(),
    }
}

fn join_or_no_data(values: Option<&[String]>) -> String {
    match values {
        Some(v) if !v.is_empty() => v.join(", "),
        _ => NO_DATA.to_string(),
    }
}
