//! Captured frames and recognizer output

use chrono::{DateTime, Utc};
use image::RgbaImage;

/// One frame taken from the frame source
#[derive(Debug, Clone)]
pub struct RawCapture {
    image: RgbaImage,
    captured_at: DateTime<Utc>,
}

impl RawCapture {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            captured_at: Utc::now(),
        }
    }

    /// Build from a raw RGBA buffer; `None` if the buffer length does not
    /// match `width * height * 4`
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Interleaved RGBA bytes
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// Output of a recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionResult {
    /// Payload decoded from a barcode
    DecodedCode(String),
    /// Text extracted by OCR in the given language
    RecognizedText { text: String, language: String },
}

impl RecognitionResult {
    pub fn text(&self) -> &str {
        match self {
            RecognitionResult::DecodedCode(text) => text,
            RecognitionResult::RecognizedText { text, .. } => text,
        }
    }
}
