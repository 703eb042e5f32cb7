//! Append-log client
//!
//! Posts each resolved book as JSON to an external spreadsheet endpoint.
//! The response status is deliberately not interpreted: `Sent` only means
//! the request left without a transport error, not that a row was stored.

use crate::models::CanonicalBook;
use async_trait::async_trait;
use shelfscan_common::config::AppendConfig;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Result of one append attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Request sent without transport error (storage not confirmed)
    Sent,
    /// Transport error; the book was displayed but not appended
    Failed(String),
    /// No endpoint configured
    Disabled,
}

impl fmt::Display for AppendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppendOutcome::Sent => f.write_str("sent"),
            AppendOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            AppendOutcome::Disabled => f.write_str("disabled"),
        }
    }
}

/// External append-only record of scanned books
#[async_trait]
pub trait AppendLog: Send + Sync {
    async fn append(&self, book: &CanonicalBook) -> AppendOutcome;
}

/// HTTP POST appender for a spreadsheet web app
pub struct SheetAppender {
    http_client: reqwest::Client,
    endpoint: String,
}

impl SheetAppender {
    pub fn new(endpoint: impl Into<String>, timeout_secs: Option<u64>) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http_client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AppendLog for SheetAppender {
    async fn append(&self, book: &CanonicalBook) -> AppendOutcome {
        tracing::debug!(endpoint = %self.endpoint, isbn = %book.isbn, "Posting book to append log");

        match self.http_client.post(&self.endpoint).json(book).send().await {
            Ok(response) => {
                // Status intentionally not treated as success/failure
                tracing::debug!(status = %response.status(), "Append request sent");
                AppendOutcome::Sent
            }
            Err(e) => {
                tracing::error!(endpoint = %self.endpoint, error = %e, "Append request failed");
                AppendOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Used when no append endpoint is configured
pub struct DisabledAppendLog;

#[async_trait]
impl AppendLog for DisabledAppendLog {
    async fn append(&self, book: &CanonicalBook) -> AppendOutcome {
        tracing::debug!(isbn = %book.isbn, "Append log disabled, skipping");
        AppendOutcome::Disabled
    }
}

/// Appender for the configured endpoint, or the disabled log
pub fn append_log_from_config(config: &AppendConfig) -> reqwest::Result<Arc<dyn AppendLog>> {
    match &config.endpoint {
        Some(endpoint) if !endpoint.trim().is_empty() => Ok(Arc::new(SheetAppender::new(
            endpoint.trim(),
            config.timeout_secs,
        )?)),
        _ => {
            tracing::info!("No append endpoint configured; books will only be displayed");
            Ok(Arc::new(DisabledAppendLog))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_DATA;

    fn book() -> CanonicalBook {
        CanonicalBook {
            isbn: "9784061519677".into(),
            title: "t".into(),
            authors: NO_DATA.into(),
            publisher: NO_DATA.into(),
            description: NO_DATA.into(),
            categories: NO_DATA.into(),
            image_url: NO_DATA.into(),
            preview_link: NO_DATA.into(),
        }
    }

    #[tokio::test]
    async fn test_disabled_log_reports_disabled() {
        assert_eq!(DisabledAppendLog.append(&book()).await, AppendOutcome::Disabled);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_failure() {
        // Bind then drop to obtain a port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let appender =
            SheetAppender::new(format!("http://127.0.0.1:{}/append", port), Some(5)).unwrap();
        match appender.append(&book()).await {
            AppendOutcome::Failed(reason) => assert!(!reason.is_empty()),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_endpoint_disables_append() {
        let config = AppendConfig {
            endpoint: Some("   ".into()),
            timeout_secs: None,
        };
        assert!(append_log_from_config(&config).is_ok());
    }
}
