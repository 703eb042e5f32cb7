//! Catalog response types and the canonical book record

use serde::{Deserialize, Serialize};

/// Placeholder for any field the catalog did not provide
pub const NO_DATA: &str = "no data";

/// Volumes search response
///
/// `items` is absent when nothing matched; that is a valid empty result.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

impl VolumesResponse {
    /// Candidate records in response order
    pub fn into_candidates(self) -> Vec<CandidateRecord> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.volume_info)
            .collect()
    }
}

/// One search hit
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub volume_info: CandidateRecord,
}

/// Volume metadata before selection and normalization
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub preview_link: Option<String>,
    #[serde(default)]
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

impl CandidateRecord {
    /// Publisher present and not blank
    pub fn has_publisher(&self) -> bool {
        self.publisher
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub small_thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// e.g. `{"type": "ISBN_13", "identifier": "9784061519677"}`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub id_type: String,
    pub identifier: String,
}

/// The single normalized record chosen for display and storage
///
/// Every field holds either a real value or [`NO_DATA`], never an empty
/// placeholder, so renderers never branch on absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalBook {
    pub isbn: String,
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub description: String,
    pub categories: String,
    pub image_url: String,
    pub preview_link: String,
}
