use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transcription error: {0}")]
    Transcriber(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("No translation engine available for '{language}' (fallback '{fallback}' also failed)")]
    NoTranslationEngine { language: String, fallback: String },
}

pub type Result<T> = std::result::Result<T, TransubError>;
