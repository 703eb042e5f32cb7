//! Command-driven frame source
//!
//! Runs a capture program once per frame, e.g.
//! `ffmpeg -f v4l2 -i /dev/video0 -frames:v 1 {output}`.
//! `{output}` in any argument is replaced by a temporary PNG path.

use super::still_image::load_frame;
use super::{FrameSource, FrameSourceError, PlaybackGate};
use crate::models::RawCapture;
use crate::tools::{self, TempPath, ToolError};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

/// Placeholder replaced by the frame output path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

pub struct CommandFrameSource {
    program: String,
    args: Vec<String>,
    gate: PlaybackGate,
}

impl CommandFrameSource {
    pub fn new(program: String, args: Vec<String>) -> Self {
        if !args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER)) {
            tracing::warn!(
                program = %program,
                "Capture arguments lack {} placeholder; frames may not be found",
                OUTPUT_PLACEHOLDER
            );
        }
        Self {
            program,
            args,
            gate: PlaybackGate::default(),
        }
    }

    fn expand_args(&self, output: &Path) -> Vec<OsString> {
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| OsString::from(arg.replace(OUTPUT_PLACEHOLDER, &output)))
            .collect()
    }

    async fn grab(&self) -> Result<RawCapture, FrameSourceError> {
        let output_path = TempPath::new("frame", "png");
        let args = self.expand_args(output_path.path());
        let program = self.program.clone();

        let output = tokio::task::spawn_blocking(move || tools::run_tool(&program, &args))
            .await
            .map_err(|e| FrameSourceError::CaptureFailed(format!("Capture task failed: {}", e)))?
            .map_err(|e| match e {
                ToolError::NotFound(_) => FrameSourceError::Unavailable(e.to_string()),
                other => FrameSourceError::CaptureFailed(other.to_string()),
            })?;

        if !output.status.success() {
            return Err(FrameSourceError::CaptureFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                tools::stderr_text(&output)
            )));
        }

        // output_path removes the file once the frame is decoded
        load_frame(output_path.path()).await
    }
}

#[async_trait]
impl FrameSource for CommandFrameSource {
    fn name(&self) -> &'static str {
        "capture-command"
    }

    async fn start(&self) -> Result<(), FrameSourceError> {
        // Probe capture proves the device and tool work
        let frame = self
            .grab()
            .await
            .map_err(|e| FrameSourceError::Unavailable(e.to_string()))?;

        tracing::info!(
            program = %self.program,
            width = frame.width(),
            height = frame.height(),
            "Capture command frame source ready"
        );
        self.gate.resume();
        Ok(())
    }

    async fn capture(&self) -> Result<RawCapture, FrameSourceError> {
        self.grab().await
    }

    fn pause(&self) {
        self.gate.pause();
    }

    fn resume(&self) {
        self.gate.resume();
    }

    fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }
}
