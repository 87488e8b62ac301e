//! Transub - translated subtitles for a video
//!
//! Extracts the audio track with ffmpeg, transcribes it with Whisper, detects
//! the spoken language, translates every segment with a Marian model and
//! writes an SRT file, optionally burning it into a copy of the video.

pub mod accelerator;
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod media;
pub mod subtitle;
pub mod transcribe;
pub mod transcript;
pub mod translate;
pub mod workflow;
