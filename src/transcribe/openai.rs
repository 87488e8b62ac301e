// OpenAI Whisper command-line implementation

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use super::{TranscriberTrait, WhisperModel};
use crate::accelerator::{Accelerator, Device};
use crate::config::TranscriberConfig;
use crate::error::{Result, TransubError};
use crate::transcript::{Segment, Transcript};

/// OpenAI Whisper JSON output format; the joined `text` field is not needed
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIWhisperOutput {
    #[serde(default)]
    pub segments: Vec<OpenAIWhisperSegment>,
    pub language: Option<String>,
}

/// OpenAI Whisper segment format; fields beyond timing and text are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIWhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl From<OpenAIWhisperOutput> for Transcript {
    fn from(output: OpenAIWhisperOutput) -> Self {
        let segments = output
            .segments
            .into_iter()
            .map(|seg| Segment::new(seg.start, seg.end, seg.text.trim()))
            .collect();

        Transcript {
            segments,
            language: output.language,
        }
    }
}

/// Transcriber driving the `whisper` command-line tool
pub struct OpenAITranscriber {
    config: TranscriberConfig,
    accelerator: Accelerator,
}

impl OpenAITranscriber {
    pub fn new(config: TranscriberConfig, accelerator: Accelerator) -> Self {
        Self { config, accelerator }
    }

    fn build_command(
        &self,
        audio_path: &Path,
        output_dir: &Path,
        model: WhisperModel,
        device: Device,
    ) -> Command {
        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(audio_path)
            .arg("--model").arg(model.as_str())
            .arg("--output_dir").arg(output_dir)
            .arg("--output_format").arg("json")
            .arg("--task").arg("transcribe")
            .arg("--verbose").arg("False")
            .arg("--device").arg(device.as_str());

        // Half precision is only supported on the GPU
        if !device.is_gpu() {
            cmd.arg("--fp16").arg("False");
        }

        cmd
    }
}

/// Parse the JSON file whisper writes next to its other outputs
pub fn parse_output(json_content: &str) -> Result<Transcript> {
    let output: OpenAIWhisperOutput = serde_json::from_str(json_content)
        .map_err(|e| TransubError::Transcriber(format!("Failed to parse whisper JSON: {}", e)))?;
    Ok(output.into())
}

#[async_trait]
impl TranscriberTrait for OpenAITranscriber {
    async fn transcribe(&self, audio_path: &Path, model: WhisperModel) -> Result<Transcript> {
        let device = self.accelerator.select(self.config.device).await;
        info!(
            "Transcribing {} with whisper model '{}' on {}",
            audio_path.display(),
            model,
            device
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| TransubError::Transcriber(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let mut cmd = self.build_command(audio_path, output_dir, model, device);
        debug!("Executing whisper command: {:?}", cmd);

        let output = cmd
            .output()
            .await
            .map_err(|e| TransubError::Transcriber(format!("Failed to execute whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransubError::Transcriber(format!(
                "Whisper failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let audio_stem = audio_path
            .file_stem()
            .ok_or_else(|| TransubError::Transcriber("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        let json_content = tokio::fs::read_to_string(&json_file)
            .await
            .map_err(|e| TransubError::Transcriber(format!("Failed to read whisper output: {}", e)))?;

        let transcript = parse_output(&json_content)?;
        info!(
            "Whisper produced {} segments (reported language: {})",
            transcript.segments.len(),
            transcript.language.as_deref().unwrap_or("unknown")
        );

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accelerator::DevicePolicy;

    #[test]
    fn test_parse_output_trims_text() {
        let json = r#"{
            "text": " Hello world. Again.",
            "segments": [
                {"id": 0, "seek": 0, "start": 0.0, "end": 1.5, "text": " Hello world. ",
                 "tokens": [1, 2], "temperature": 0.0, "avg_logprob": -0.2,
                 "compression_ratio": 1.1, "no_speech_prob": 0.01},
                {"id": 1, "seek": 0, "start": 1.5, "end": 3.0, "text": "Again.\n"}
            ],
            "language": "en"
        }"#;

        let transcript = parse_output(json).unwrap();
        assert_eq!(
            transcript.segments,
            vec![Segment::new(0.0, 1.5, "Hello world."), Segment::new(1.5, 3.0, "Again.")]
        );
        assert_eq!(transcript.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_parse_output_without_segments() {
        let transcript = parse_output(r#"{"text": "", "language": null}"#).unwrap();
        assert!(transcript.is_empty());
        assert!(transcript.language.is_none());
    }

    #[test]
    fn test_parse_output_rejects_garbage() {
        assert!(matches!(parse_output("not json"), Err(TransubError::Transcriber(_))));
    }

    #[test]
    fn test_cpu_command_disables_fp16() {
        let transcriber = OpenAITranscriber::new(
            TranscriberConfig {
                binary_path: "whisper".to_string(),
                device: DevicePolicy::Cpu,
            },
            Accelerator::new(),
        );
        let cmd = transcriber.build_command(
            Path::new("/tmp/audio.wav"),
            Path::new("/tmp/out"),
            WhisperModel::Base,
            Device::Cpu,
        );

        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "/tmp/audio.wav", "--model", "base", "--output_dir", "/tmp/out",
                "--output_format", "json", "--task", "transcribe", "--verbose", "False",
                "--device", "cpu", "--fp16", "False"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_transcriber_error() {
        let transcriber = OpenAITranscriber::new(
            TranscriberConfig {
                binary_path: "transub-no-such-whisper".to_string(),
                device: DevicePolicy::Cpu,
            },
            Accelerator::new(),
        );

        let err = transcriber
            .transcribe(Path::new("/tmp/audio.wav"), WhisperModel::Tiny)
            .await
            .unwrap_err();
        assert!(matches!(err, TransubError::Transcriber(_)));
    }
}
