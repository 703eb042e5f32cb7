//! Error types for shelfscan
//!
//! Every failure of a scan attempt is a [`ScanError`]. Only
//! `CameraUnavailable` is fatal; the orchestrator converts all other
//! variants into a status message and resumes capture.

use crate::models::IdentifierSource;
use thiserror::Error;

/// Scan attempt error taxonomy
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScanError {
    /// Frame source could not be acquired (fatal for the session)
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// No frame, no decodable barcode or OCR tool failure
    #[error("Recognition failed ({origin}): {reason}")]
    RecognitionFailure {
        origin: IdentifierSource,
        reason: String,
    },

    /// Recognized text does not satisfy the identifier shape rules
    #[error("No identifier found ({origin}): {text:?}")]
    ClassificationFailure {
        origin: IdentifierSource,
        text: String,
    },

    /// Catalog returned an empty result list
    #[error("No results found for {0}")]
    NoResultsFound(String),

    /// Network, HTTP status or response parse failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Manual entry submitted without text
    #[error("Manual entry is empty")]
    EmptyManualEntry,
}

impl ScanError {
    /// Whether the session can continue after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ScanError::CameraUnavailable(_))
    }

    /// Text shown on the status line for this error
    pub fn status_message(&self) -> String {
        match self {
            ScanError::CameraUnavailable(_) => {
                "Failed to start the camera. Check the camera device and permissions, then restart."
                    .to_string()
            }
            ScanError::RecognitionFailure { origin, .. } => match origin {
                IdentifierSource::Barcode => {
                    "No barcode found. Please try again.".to_string()
                }
                _ => "An error occurred during OCR. Please try again.".to_string(),
            },
            ScanError::ClassificationFailure { origin, .. } => match origin {
                IdentifierSource::Barcode => {
                    "Not a valid book barcode. Please try again.".to_string()
                }
                IdentifierSource::IsbnText => {
                    "Could not read an ISBN number. Please try again.".to_string()
                }
                IdentifierSource::TitleText | IdentifierSource::Manual => {
                    "Could not read a title. Please try again.".to_string()
                }
            },
            ScanError::NoResultsFound(_) => {
                "Book information not found. Please try again.".to_string()
            }
            ScanError::Transport(_) => {
                "An error occurred while searching for book information. Please try again."
                    .to_string()
            }
            ScanError::EmptyManualEntry => "Please enter a title.".to_string(),
        }
    }
}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_camera_failure_is_fatal() {
        assert!(!ScanError::CameraUnavailable("no device".into()).is_recoverable());
        assert!(ScanError::NoResultsFound("isbn:1".into()).is_recoverable());
        assert!(ScanError::Transport("reset".into()).is_recoverable());
        assert!(ScanError::EmptyManualEntry.is_recoverable());
        assert!(ScanError::RecognitionFailure {
            origin: IdentifierSource::Barcode,
            reason: "none".into(),
        }
        .is_recoverable());
    }

    #[test]
    fn test_status_messages_follow_source() {
        let barcode = ScanError::ClassificationFailure {
            origin: IdentifierSource::Barcode,
            text: "4901234567894".into(),
        };
        let isbn = ScanError::ClassificationFailure {
            origin: IdentifierSource::IsbnText,
            text: "12-34".into(),
        };
        assert!(barcode.status_message().contains("barcode"));
        assert!(isbn.status_message().contains("ISBN"));
        assert!(ScanError::NoResultsFound("q".into())
            .status_message()
            .contains("not found"));
    }
}
