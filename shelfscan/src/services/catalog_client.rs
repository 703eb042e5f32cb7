//! Book catalog API client
//!
//! Searches the Google Books volumes endpoint:
//! `GET {endpoint}?q={isbn:|intitle:}<value>&key=<api key>&lang=<language>`
//!
//! A response without `items` is an empty candidate list, not an error.

use crate::models::{CandidateRecord, VolumesResponse};
use async_trait::async_trait;
use shelfscan_common::config::CatalogConfig;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("shelfscan/", env!("CARGO_PKG_VERSION"));

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Source of candidate records for a search term
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Candidates in catalog order; empty when nothing matched
    async fn search(&self, search_term: &str) -> Result<Vec<CandidateRecord>, CatalogError>;
}

/// Google Books API client
pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    language: String,
}

impl GoogleBooksClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        if config.api_key.is_none() {
            tracing::warn!("No catalog API key configured; searching without one");
        }

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    fn query_params<'a>(&'a self, search_term: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("q", search_term)];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }
        params.push(("lang", self.language.as_str()));
        params
    }
}

#[async_trait]
impl BookCatalog for GoogleBooksClient {
    async fn search(&self, search_term: &str) -> Result<Vec<CandidateRecord>, CatalogError> {
        tracing::debug!(q = %search_term, endpoint = %self.endpoint, "Querying book catalog");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&self.query_params(search_term))
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        let volumes: VolumesResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let total_items = volumes.total_items;
        let candidates = volumes.into_candidates();

        tracing::info!(
            q = %search_term,
            total_items,
            candidates = candidates.len(),
            "Catalog search complete"
        );

        Ok(candidates)
    }
}
