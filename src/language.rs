//! Source language identification.
//!
//! Detection is best effort: a short sample of the transcript is classified
//! once, and callers fall back to a default language on [`Detection::Unknown`].

use isolang::Language;
use tracing::debug;

use crate::transcript::Segment;

/// Outcome of a language identification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// ISO 639-1 code of the guessed language
    Detected(String),
    Unknown,
}

#[cfg_attr(test, mockall::automock)]
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Detection;
}

/// Trigram based detector from the `whatlang` crate
#[derive(Debug, Default)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Detection {
        if text.trim().is_empty() {
            return Detection::Unknown;
        }

        let Some(info) = whatlang::detect(text) else {
            return Detection::Unknown;
        };

        debug!(
            "whatlang guessed {} (confidence {:.2}, reliable: {})",
            info.lang().code(),
            info.confidence(),
            info.is_reliable()
        );

        match to_639_1(info.lang().code()) {
            Some(code) => Detection::Detected(code.to_string()),
            None => Detection::Unknown,
        }
    }
}

/// Map an ISO 639-3 code to its two-letter form, if it has one
fn to_639_1(code: &str) -> Option<&'static str> {
    Language::from_639_3(code).and_then(|lang| lang.to_639_1())
}

/// Join the text of the first `count` segments with single spaces
pub fn detection_sample(segments: &[Segment], count: usize) -> String {
    segments
        .iter()
        .take(count)
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
