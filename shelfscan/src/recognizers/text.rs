//! Text recognition via `tesseract`
//!
//! `tesseract <frame.png> stdout -l <lang> [-c tessedit_char_whitelist=<chars>]`

use super::{Recognizer, RecognizerError};
use crate::models::{RawCapture, RecognitionResult};
use crate::tools;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

pub struct TextRecognizer {
    program: String,
    language: String,
    whitelist: Option<String>,
}

impl TextRecognizer {
    pub fn new(program: impl Into<String>, language: impl Into<String>, whitelist: Option<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
            whitelist,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn build_args(&self, frame: &Path) -> Vec<OsString> {
        let mut args = vec![
            frame.as_os_str().to_os_string(),
            OsString::from("stdout"),
            OsString::from("-l"),
            OsString::from(&self.language),
        ];
        if let Some(whitelist) = &self.whitelist {
            args.push(OsString::from("-c"));
            args.push(OsString::from(format!("tessedit_char_whitelist={}", whitelist)));
        }
        args
    }
}

#[async_trait]
impl Recognizer for TextRecognizer {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, capture: &RawCapture) -> Result<RecognitionResult, RecognizerError> {
        let image = capture.image().clone();
        let program = self.program.clone();
        let frame = tools::TempPath::new("ocr", "png");
        let args = self.build_args(frame.path());

        let output = tokio::task::spawn_blocking(move || {
            image
                .save(frame.path())
                .map_err(|e| tools::ToolError::FrameWrite(e.to_string()))?;
            let output = tools::run_tool(&program, &args);
            drop(frame);
            output
        })
        .await
        .map_err(|e| RecognizerError::Task(e.to_string()))??;

        if !output.status.success() {
            return Err(RecognizerError::ToolExit {
                status: output.status.to_string(),
                stderr: tools::stderr_text(&output),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        tracing::debug!(language = %self.language, chars = text.chars().count(), "OCR complete");

        Ok(RecognitionResult::RecognizedText {
            text,
            language: self.language.clone(),
        })
    }
}
