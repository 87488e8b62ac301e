//! Transub - translated subtitles for a video
//!
//! Entry point: parses arguments, sets up logging and configuration, then
//! runs the pipeline once.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use transub::cli::Args;
use transub::config::Config;
use transub::workflow::{RunOutcome, Workflow};

const DEFAULT_CONFIG_FILE: &str = "transub.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Held until exit so buffered file logs are flushed
    let _log_guard = setup_logging(args.verbose)?;

    info!("Starting Transub");

    let mut config = load_config(args.config.as_deref())?;
    config.apply_env();

    let workflow = Workflow::new(config)?;
    match workflow.run(&args.job()).await? {
        RunOutcome::NoSpeech => {
            println!("No speech detected; no subtitle file was written.");
        }
        RunOutcome::Completed {
            subtitle_path,
            video_path,
            source_language,
            segment_count,
        } => {
            println!(
                "Wrote {} subtitles translated from '{}' to {}",
                segment_count,
                source_language,
                subtitle_path.display()
            );
            if let Some(video_path) = video_path {
                println!("Subtitled video: {}", video_path.display());
            }
        }
    }

    info!("Transub completed successfully");
    Ok(())
}

/// Explicit path first, then transub.toml in the current directory, then defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            if local.exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(&local)?
            } else {
                Config::default()
            }
        }
    };
    Ok(config)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = std::env::current_dir()?.join(".transub").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "transub.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("transub.log").display()
    );

    Ok(guard)
}
