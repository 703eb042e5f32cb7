//! Recognizers: frame → decoded payload or text
//!
//! Two capability variants behind one trait:
//! - [`BarcodeDecoder`] (zbar command-line tool)
//! - [`TextRecognizer`] (tesseract, with language and character whitelist)
//!
//! Both are black boxes; this module only moves frames in and text out.

pub mod barcode;
pub mod text;

pub use barcode::BarcodeDecoder;
pub use text::TextRecognizer;

use crate::models::{RawCapture, RecognitionResult};
use crate::tools::ToolError;
use crate::workflow::ScanMode;
use async_trait::async_trait;
use shelfscan_common::config::RecognitionConfig;
use std::sync::Arc;
use thiserror::Error;

/// Recognizer errors
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// Nothing decodable in the frame
    #[error("Nothing recognized in frame")]
    NothingRecognized,

    /// The external tool failed
    #[error("Recognizer tool failed: {0}")]
    Tool(#[from] ToolError),

    /// The tool ran but reported an error
    #[error("Recognizer exited with {status}: {stderr}")]
    ToolExit { status: String, stderr: String },

    #[error("Recognition task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn recognize(&self, capture: &RawCapture) -> Result<RecognitionResult, RecognizerError>;
}

/// One recognizer per scan mode
#[derive(Clone)]
pub struct Recognizers {
    pub barcode: Arc<dyn Recognizer>,
    pub isbn_text: Arc<dyn Recognizer>,
    pub title_text: Arc<dyn Recognizer>,
}

impl Recognizers {
    /// zbarimg for barcodes, tesseract for ISBN digits and titles
    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self {
            barcode: Arc::new(BarcodeDecoder::new(config.barcode_program.clone())),
            isbn_text: Arc::new(TextRecognizer::new(
                config.ocr_program.clone(),
                config.isbn_language.clone(),
                Some(config.isbn_whitelist.clone()).filter(|w| !w.is_empty()),
            )),
            title_text: Arc::new(TextRecognizer::new(
                config.ocr_program.clone(),
                config.title_language.clone(),
                None,
            )),
        }
    }

    pub fn for_mode(&self, mode: ScanMode) -> &Arc<dyn Recognizer> {
        match mode {
            ScanMode::Barcode => &self.barcode,
            ScanMode::IsbnText => &self.isbn_text,
            ScanMode::TitleText => &self.title_text,
        }
    }
}
