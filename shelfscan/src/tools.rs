//! External command-line tool execution
//!
//! Capture and recognition delegate to installed tools (ffmpeg, zbarimg,
//! tesseract). Processes run on the blocking pool; frames travel through
//! uniquely named temporary PNG files removed on drop.

use image::RgbaImage;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// Program not found in PATH
    #[error("{0} not found in PATH")]
    NotFound(String),

    /// Failed to spawn or wait for the program
    #[error("Failed to execute {program}: {message}")]
    Execution { program: String, message: String },

    /// Temporary frame file could not be written
    #[error("Failed to write frame file: {0}")]
    FrameWrite(String),
}

/// Temporary file path deleted when dropped
#[derive(Debug)]
pub struct TempPath {
    path: PathBuf,
}

impl TempPath {
    /// Fresh path in the system temp dir, e.g. `shelfscan_frame_<uuid>.png`
    pub fn new(prefix: &str, extension: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "shelfscan_{}_{}.{}",
            prefix,
            uuid::Uuid::new_v4(),
            extension
        ));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove temp file");
            }
        }
    }
}

/// Encode a frame as PNG into a temp file
pub fn write_temp_frame(image: &RgbaImage) -> Result<TempPath, ToolError> {
    let temp = TempPath::new("frame", "png");
    image
        .save(temp.path())
        .map_err(|e| ToolError::FrameWrite(e.to_string()))?;
    Ok(temp)
}

/// Run `program args...` to completion and collect its output
///
/// Blocking; call from `spawn_blocking`.
pub fn run_tool(program: &str, args: &[OsString]) -> Result<Output, ToolError> {
    tracing::debug!(program = %program, args = ?args, "Running external tool");

    Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ToolError::NotFound(program.to_string())
        } else {
            ToolError::Execution {
                program: program.to_string(),
                message: e.to_string(),
            }
        }
    })
}

/// Trimmed stderr, for error messages
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
