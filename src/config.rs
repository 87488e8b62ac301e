use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::accelerator::DevicePolicy;
use crate::error::{Result, TransubError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transcriber: TranscriberConfig,
    pub detection: DetectionConfig,
    pub translate: TranslateConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Path to the whisper command-line tool
    pub binary_path: String,
    /// Device whisper runs on
    pub device: DevicePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Number of leading segments sampled for language identification
    pub sample_segments: usize,
    /// Language assumed when identification fails
    pub default_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Base URL of the translation inference server
    pub endpoint: String,
    /// Bearer token sent to the server, if it requires one
    pub api_token: Option<String>,
    /// Language every segment is translated into
    pub target_language: String,
    /// Source language tried when no model exists for the detected one
    pub fallback_language: String,
    /// Number of segments submitted per request
    pub batch_size: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Device the translation model runs on
    pub device: DevicePolicy,
    /// Extra or replacement entries for the source language -> model table
    pub models: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Font family used when burning subtitles
    pub font_name: String,
    /// Font size used when burning subtitles
    pub font_size: u32,
    /// Additional encoding options for subtitle burn-in
    /// Common options: ["-preset", "medium", "-crf", "23", "-pix_fmt", "yuv420p"]
    pub subtitle_options: Vec<String>,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            binary_path: "whisper".to_string(),
            device: DevicePolicy::Auto,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_segments: 3,
            default_language: "en".to_string(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            api_token: None,
            target_language: "ar".to_string(),
            fallback_language: "en".to_string(),
            batch_size: 4,
            timeout_secs: 300,
            device: DevicePolicy::Auto,
            models: BTreeMap::new(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            font_name: "Arial".to_string(),
            font_size: 24,
            subtitle_options: vec![],
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TransubError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| TransubError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.translate.batch_size == 0 {
            return Err(TransubError::Config(
                "translate.batch_size must be at least 1".to_string(),
            ));
        }
        if self.detection.sample_segments == 0 {
            return Err(TransubError::Config(
                "detection.sample_segments must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply overrides taken from the environment
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("TRANSUB_API_TOKEN") {
            if !token.trim().is_empty() {
                self.translate.api_token = Some(token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: Config = toml::from_str(
            r#"
            [translate]
            target_language = "fr"
            batch_size = 8

            [translate.models]
            ja = "Helsinki-NLP/opus-mt-ja-fr"
            "#,
        )
        .unwrap();

        assert_eq!(config.translate.target_language, "fr");
        assert_eq!(config.translate.batch_size, 8);
        assert_eq!(config.translate.fallback_language, "en");
        assert_eq!(config.translate.models["ja"], "Helsinki-NLP/opus-mt-ja-fr");
        assert_eq!(config.media.binary_path, "ffmpeg");
        assert_eq!(config.detection.sample_segments, 3);
        assert_eq!(config.transcriber.device, DevicePolicy::Auto);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = Config::default();
        config.translate.batch_size = 0;
        assert!(matches!(config.validate(), Err(TransubError::Config(_))));
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transub.toml");

        let mut config = Config::default();
        config.media.font_size = 32;
        config.transcriber.device = DevicePolicy::Cpu;
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.media.font_size, 32);
        assert_eq!(loaded.transcriber.device, DevicePolicy::Cpu);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "translate = [").unwrap();

        assert!(matches!(Config::from_file(&path), Err(TransubError::Config(_))));
    }
}
