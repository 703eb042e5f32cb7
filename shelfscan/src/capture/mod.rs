//! Frame acquisition
//!
//! A [`FrameSource`] hands out snapshots of the current frame and owns a
//! play/pause flag. Only the orchestrator pauses and resumes it.

pub mod command_source;
pub mod preprocess;
pub mod still_image;

pub use command_source::CommandFrameSource;
pub use preprocess::Preprocessor;
pub use still_image::StillImageSource;

use crate::models::RawCapture;
use async_trait::async_trait;
use shelfscan_common::config::{CaptureConfig, CaptureSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Frame source errors
#[derive(Debug, Error)]
pub enum FrameSourceError {
    /// Device, file or capture tool not usable
    #[error("Frame source unavailable: {0}")]
    Unavailable(String),

    /// A single capture failed
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    /// Captured data could not be decoded as an image
    #[error("Frame decode failed: {0}")]
    Decode(String),
}

#[async_trait]
pub trait FrameSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Acquire the device; failure here is fatal for the session
    async fn start(&self) -> Result<(), FrameSourceError>;

    /// Snapshot of the current frame
    async fn capture(&self) -> Result<RawCapture, FrameSourceError>;

    /// Freeze the live view
    fn pause(&self);

    /// Resume the live view (no-op when already live)
    fn resume(&self);

    fn is_paused(&self) -> bool;
}

/// Play/pause flag shared by frame source implementations
#[derive(Debug, Default)]
pub struct PlaybackGate {
    paused: AtomicBool,
}

impl PlaybackGate {
    pub fn pause(&self) {
        if self.paused.swap(true, Ordering::SeqCst) {
            tracing::warn!("Frame source paused twice without resume");
        }
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Build the configured frame source
pub fn frame_source_from_config(config: &CaptureConfig) -> Arc<dyn FrameSource> {
    match config.source {
        CaptureSource::Still => Arc::new(StillImageSource::new(config.path.clone())),
        CaptureSource::Command => Arc::new(CommandFrameSource::new(
            config.program.clone(),
            config.args.clone(),
        )),
    }
}
