use std::collections::BTreeMap;

use crate::config::TranslateConfig;

/// Source languages with a published Marian model in the default table
pub const SUPPORTED_SOURCES: [&str; 8] = ["en", "fr", "es", "de", "ru", "pt", "it", "nl"];

/// Source language -> translation model identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelTable {
    models: BTreeMap<String, String>,
}

impl ModelTable {
    /// Helsinki-NLP opus-mt models from every supported source into `target`
    pub fn marian(target_language: &str) -> Self {
        let models = SUPPORTED_SOURCES
            .iter()
            .filter(|source| **source != target_language)
            .map(|source| (source.to_string(), marian_model_id(source, target_language)))
            .collect();

        Self { models }
    }

    /// Default table for the configured target, with configured entries layered on top
    pub fn from_config(config: &TranslateConfig) -> Self {
        let mut table = Self::marian(&config.target_language);
        for (source, model) in &config.models {
            table.insert(source, model);
        }
        table
    }

    pub fn insert<S1: Into<String>, S2: Into<String>>(&mut self, source: S1, model: S2) {
        self.models.insert(source.into().to_lowercase(), model.into());
    }

    pub fn model_for(&self, source_language: &str) -> Option<&str> {
        self.models
            .get(&source_language.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

pub fn marian_model_id(source: &str, target: &str) -> String {
    format!("Helsinki-NLP/opus-mt-{}-{}", source, target)
}
