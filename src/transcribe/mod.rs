// Speech recognition
//
// Transcribers turn a waveform into timestamped segments. The only
// implementation drives the OpenAI Whisper command-line tool:
// - OpenAI: `whisper` CLI with JSON output

pub mod openai;

pub use openai::OpenAITranscriber;

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, TransubError};
use crate::transcript::Transcript;

/// Whisper model size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhisperModel {
    Tiny,
    Base,
    #[default]
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    pub const ALL: [WhisperModel; 5] = [
        WhisperModel::Tiny,
        WhisperModel::Base,
        WhisperModel::Small,
        WhisperModel::Medium,
        WhisperModel::Large,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WhisperModel::Tiny => "tiny",
            WhisperModel::Base => "base",
            WhisperModel::Small => "small",
            WhisperModel::Medium => "medium",
            WhisperModel::Large => "large",
        }
    }
}

impl fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WhisperModel {
    type Err = TransubError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == wanted)
            .ok_or_else(|| {
                TransubError::Config(format!(
                    "Invalid whisper model '{}'. Valid models: tiny, base, small, medium, large",
                    s
                ))
            })
    }
}

/// Main trait for transcription operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriberTrait: Send + Sync {
    /// Transcribe a waveform file into segments. An empty transcript is not an error.
    async fn transcribe(&self, audio_path: &Path, model: WhisperModel) -> Result<Transcript>;
}
