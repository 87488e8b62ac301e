// Media processing through an external transcoder
//
// - Processor: ffmpeg-backed implementation of the trait below
// - Commands: command builders for the two invocations the pipeline needs

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::error::Result;

/// Main trait for media processing operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessorTrait: Send + Sync {
    /// Extract a mono 16kHz waveform from a video
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Burn subtitles into a re-encoded copy of the video
    async fn burn_subtitles(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
    ) -> Result<()>;

    /// Check the media processor can be run, returning its version line
    async fn check_availability(&self) -> Result<String>;
}
