use clap::Parser;
use std::path::PathBuf;

use crate::transcribe::WhisperModel;
use crate::workflow::Job;

/// Transcribe a video, translate the speech and write subtitles
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input video file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output subtitle file
    #[arg(short, long, default_value = "out.srt")]
    pub output: PathBuf,

    /// Whisper model size (tiny, base, small, medium, large)
    #[arg(long, default_value = "small")]
    pub whisper_model: WhisperModel,

    /// Burn the subtitles into a copy of the video
    #[arg(long)]
    pub burn: bool,

    /// Output video file when --burn is set
    #[arg(long, default_value = "out_subbed.mp4")]
    pub out_video: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn job(&self) -> Job {
        Job {
            input: self.input.clone(),
            output: self.output.clone(),
            whisper_model: self.whisper_model,
            burn_video: self.burn.then(|| self.out_video.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["transub", "-i", "movie.mp4"]).unwrap();

        assert_eq!(args.input, PathBuf::from("movie.mp4"));
        assert_eq!(args.output, PathBuf::from("out.srt"));
        assert_eq!(args.whisper_model, WhisperModel::Small);
        assert!(!args.burn);
        assert_eq!(args.out_video, PathBuf::from("out_subbed.mp4"));

        let job = args.job();
        assert!(job.burn_video.is_none());
    }

    #[test]
    fn test_burn_flags() {
        let args = Args::try_parse_from([
            "transub",
            "--input",
            "movie.mp4",
            "--output",
            "movie.ar.srt",
            "--whisper-model",
            "medium",
            "--burn",
            "--out-video",
            "movie.ar.mp4",
        ])
        .unwrap();

        let job = args.job();
        assert_eq!(job.output, PathBuf::from("movie.ar.srt"));
        assert_eq!(job.whisper_model, WhisperModel::Medium);
        assert_eq!(job.burn_video, Some(PathBuf::from("movie.ar.mp4")));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["transub"]).is_err());
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(Args::try_parse_from(["transub", "-i", "a.mp4", "--whisper-model", "huge"]).is_err());
    }
}
