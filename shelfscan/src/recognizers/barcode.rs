//! Barcode decoding via `zbarimg`
//!
//! `zbarimg --quiet --raw <frame.png>` prints one decoded payload per line.
//! Exit status 4 means no symbol was found.

use super::{Recognizer, RecognizerError};
use crate::models::{RawCapture, RecognitionResult};
use crate::tools;
use async_trait::async_trait;
use std::ffi::OsString;

/// zbarimg exit status when the image contains no barcode
const ZBAR_NO_SYMBOLS: i32 = 4;

pub struct BarcodeDecoder {
    program: String,
}

impl BarcodeDecoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// First non-empty output line
fn first_payload(stdout: &[u8]) -> Option<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Recognizer for BarcodeDecoder {
    fn name(&self) -> &'static str {
        "zbar"
    }

    async fn recognize(&self, capture: &RawCapture) -> Result<RecognitionResult, RecognizerError> {
        let image = capture.image().clone();
        let program = self.program.clone();

        let output = tokio::task::spawn_blocking(move || {
            let frame = tools::write_temp_frame(&image)?;
            let args = vec![
                OsString::from("--quiet"),
                OsString::from("--raw"),
                frame.path().as_os_str().to_os_string(),
            ];
            tools::run_tool(&program, &args)
        })
        .await
        .map_err(|e| RecognizerError::Task(e.to_string()))??;

        if output.status.code() == Some(ZBAR_NO_SYMBOLS) {
            return Err(RecognizerError::NothingRecognized);
        }
        if !output.status.success() {
            return Err(RecognizerError::ToolExit {
                status: output.status.to_string(),
                stderr: tools::stderr_text(&output),
            });
        }

        let payload = first_payload(&output.stdout).ok_or(RecognizerError::NothingRecognized)?;
        tracing::debug!(payload = %payload, "Barcode decoded");
        Ok(RecognitionResult::DecodedCode(payload))
    }
}
