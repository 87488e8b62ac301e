use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use super::{MediaCommandBuilder, MediaProcessorTrait, SubtitleStyle};
use crate::config::MediaConfig;
use crate::error::{Result, TransubError};

/// Media processor backed by the ffmpeg command-line tool
pub struct FfmpegProcessor {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl FfmpegProcessor {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }

    fn style(&self) -> SubtitleStyle {
        SubtitleStyle {
            font_name: self.config.font_name.clone(),
            font_size: self.config.font_size,
        }
    }
}

#[async_trait]
impl MediaProcessorTrait for FfmpegProcessor {
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        if !video_path.exists() {
            return Err(TransubError::FileNotFound(video_path.display().to_string()));
        }

        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        self.command_builder
            .extract_audio(video_path, audio_path)
            .execute()
            .await?;

        info!("Audio extraction completed");
        Ok(())
    }

    async fn burn_subtitles(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!(
            "Burning subtitles from {} into {} -> {}",
            subtitle_path.display(),
            video_path.display(),
            output_path.display()
        );

        let command = self.command_builder.burn_subtitles(
            video_path,
            subtitle_path,
            output_path,
            &self.style(),
            &self.config.subtitle_options,
        );
        info!("Running: {} {}", command.binary_path, command.args.join(" "));

        command.execute().await?;

        info!("Subtitle burn-in completed successfully");
        Ok(())
    }

    async fn check_availability(&self) -> Result<String> {
        let stdout = self
            .command_builder
            .version_check()
            .execute()
            .await
            .map_err(|e| TransubError::Media(format!("Media processor not available: {}", e)))?;

        let version = stdout.lines().next().unwrap_or("Unknown version").to_string();
        debug!("Media processor version: {}", version);
        Ok(version)
    }
}
