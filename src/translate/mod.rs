// Machine translation of transcript segments
//
// - Models: source language -> pretrained model table
// - Marian: engine backed by an inference server hosting Marian models
// - Loader: engine selection with a single fallback language
// - Batch: fixed-size batched translation of segments in place

pub mod batch;
pub mod loader;
pub mod marian;
pub mod models;

use async_trait::async_trait;
use serde_json::Value;

pub use batch::translate_segments;
pub use loader::{TranslatorLoader, load_with_fallback};
pub use models::ModelTable;

use crate::error::Result;

/// One translated item as returned by an engine. Engines are not consistent
/// about the shape of their results, so every known shape is kept here and
/// flattened with [`TranslationOutput::into_text`].
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutput {
    /// `{"translation_text": "..."}`
    Record { translation_text: String },
    /// A bare string
    Text(String),
    /// Anything else
    Other(Value),
}

impl TranslationOutput {
    pub fn from_value(value: Value) -> Self {
        if let Value::Object(map) = &value {
            if let Some(Value::String(text)) = map.get("translation_text") {
                return TranslationOutput::Record {
                    translation_text: text.clone(),
                };
            }
        }

        match value {
            Value::String(text) => TranslationOutput::Text(text),
            other => TranslationOutput::Other(other),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TranslationOutput::Record { translation_text } => translation_text,
            TranslationOutput::Text(text) => text,
            TranslationOutput::Other(value) => value.to_string(),
        }
    }
}

/// A loaded translation model
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Identifier of the model behind this engine
    fn model_id(&self) -> &str;

    /// Translate a batch of texts, one output per input in the same order
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<TranslationOutput>>;
}
