use std::path::PathBuf;
use tracing::{info, warn};

use crate::accelerator::Accelerator;
use crate::config::Config;
use crate::error::{Result, TransubError};
use crate::language::{Detection, LanguageDetector, WhatlangDetector, detection_sample};
use crate::media::{FfmpegProcessor, MediaProcessorTrait};
use crate::subtitle::write_srt;
use crate::transcribe::{OpenAITranscriber, TranscriberTrait, WhisperModel};
use crate::transcript::Segment;
use crate::translate::loader::MarianLoader;
use crate::translate::{TranslatorLoader, load_with_fallback, translate_segments};

/// What a single run should produce
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub whisper_model: WhisperModel,
    /// Where to write the subtitled video, when burn-in is requested
    pub burn_video: Option<PathBuf>,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The recognizer found no speech; nothing was written
    NoSpeech,
    Completed {
        subtitle_path: PathBuf,
        video_path: Option<PathBuf>,
        source_language: String,
        segment_count: usize,
    },
}

pub struct Workflow {
    config: Config,
    media: Box<dyn MediaProcessorTrait>,
    transcriber: Box<dyn TranscriberTrait>,
    detector: Box<dyn LanguageDetector>,
    loader: Box<dyn TranslatorLoader>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let media = Box::new(FfmpegProcessor::new(config.media.clone()));
        let transcriber = Box::new(OpenAITranscriber::new(config.transcriber.clone(), Accelerator::new()));
        let detector = Box::new(WhatlangDetector::new());
        let loader = Box::new(MarianLoader::new(config.translate.clone(), Accelerator::new())?);

        Ok(Self::with_components(config, media, transcriber, detector, loader))
    }

    pub fn with_components(
        config: Config,
        media: Box<dyn MediaProcessorTrait>,
        transcriber: Box<dyn TranscriberTrait>,
        detector: Box<dyn LanguageDetector>,
        loader: Box<dyn TranslatorLoader>,
    ) -> Self {
        Self {
            config,
            media,
            transcriber,
            detector,
            loader,
        }
    }

    /// Run every stage once, in order
    pub async fn run(&self, job: &Job) -> Result<RunOutcome> {
        let input = job.input.as_path();
        info!("Processing video file: {}", input.display());

        if !input.exists() {
            return Err(TransubError::FileNotFound(input.display().to_string()));
        }

        let version = self.media.check_availability().await?;
        info!("Using {}", version);

        // Removed on drop, whichever way this function returns
        let temp_dir = tempfile::tempdir()?;
        let audio_path = temp_dir.path().join("audio.wav");

        info!("1) Extracting audio");
        self.media.extract_audio(input, &audio_path).await?;

        info!("2) Transcribing with whisper model '{}'", job.whisper_model);
        let transcript = self.transcriber.transcribe(&audio_path, job.whisper_model).await?;
        if transcript.is_empty() {
            warn!("No speech detected in {}; no subtitle file written", input.display());
            return Ok(RunOutcome::NoSpeech);
        }
        let mut segments = transcript.segments;

        let source_language = self.detect_language(&segments);

        info!("3) Loading translation model for '{}'", source_language);
        let engine = load_with_fallback(
            self.loader.as_ref(),
            &source_language,
            &self.config.translate.fallback_language,
        )
        .await?;

        info!("4) Translating segments into '{}'", self.config.translate.target_language);
        translate_segments(&mut segments, engine.as_ref(), self.config.translate.batch_size).await?;

        info!("5) Writing SRT file: {}", job.output.display());
        write_srt(&segments, &job.output).await?;

        let video_path = match &job.burn_video {
            Some(out_video) => {
                info!("6) Burning subtitles into {}", out_video.display());
                self.media.burn_subtitles(input, &job.output, out_video).await?;
                Some(out_video.clone())
            }
            None => None,
        };

        Ok(RunOutcome::Completed {
            subtitle_path: job.output.clone(),
            video_path,
            source_language,
            segment_count: segments.len(),
        })
    }

    fn detect_language(&self, segments: &[Segment]) -> String {
        let sample = detection_sample(segments, self.config.detection.sample_segments);
        let default_language = &self.config.detection.default_language;

        match self.detector.detect(&sample) {
            Detection::Detected(code) => {
                info!("Detected source language: {}", code);
                code
            }
            Detection::Unknown => {
                warn!("Language detection failed; assuming '{}'", default_language);
                default_language.clone()
            }
        }
    }
}
