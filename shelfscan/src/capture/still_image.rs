//! Still-image frame source
//!
//! Re-reads an image file on every capture. Pairs with any camera tool
//! that keeps overwriting a snapshot file (webcam daemons, phone sync).

use super::{FrameSource, FrameSourceError, PlaybackGate};
use crate::models::RawCapture;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct StillImageSource {
    path: Option<PathBuf>,
    gate: PlaybackGate,
}

impl StillImageSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            gate: PlaybackGate::default(),
        }
    }

    fn require_path(&self) -> Result<&Path, FrameSourceError> {
        self.path.as_deref().ok_or_else(|| {
            FrameSourceError::Unavailable("no [capture].path configured".to_string())
        })
    }
}

/// Decode an image file off the async runtime
pub(crate) async fn load_frame(path: &Path) -> Result<RawCapture, FrameSourceError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        image::open(&path)
            .map(|img| RawCapture::new(img.to_rgba8()))
            .map_err(|e| FrameSourceError::Decode(format!("{}: {}", path.display(), e)))
    })
    .await
    .map_err(|e| FrameSourceError::CaptureFailed(format!("Frame load task failed: {}", e)))?
}

#[async_trait]
impl FrameSource for StillImageSource {
    fn name(&self) -> &'static str {
        "still-image"
    }

    async fn start(&self) -> Result<(), FrameSourceError> {
        let path = self.require_path()?;
        if !path.exists() {
            return Err(FrameSourceError::Unavailable(format!(
                "frame file not found: {}",
                path.display()
            )));
        }

        let frame = load_frame(path)
            .await
            .map_err(|e| FrameSourceError::Unavailable(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            width = frame.width(),
            height = frame.height(),
            "Still-image frame source ready"
        );
        self.gate.resume();
        Ok(())
    }

    async fn capture(&self) -> Result<RawCapture, FrameSourceError> {
        let path = self.require_path()?;
        load_frame(path).await
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
