use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use super::marian::{self, MarianEngine};
use super::{ModelTable, TranslationEngine};
use crate::accelerator::Accelerator;
use crate::config::TranslateConfig;
use crate::error::{Result, TransubError};

/// Text sent once when a model is loaded, to make sure it actually answers
const WARM_UP_TEXT: &str = "Hello.";

/// Resolves a source language to a ready translation engine
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslatorLoader: Send + Sync {
    /// `None` when no model is known for the language or it could not be loaded
    async fn load(&self, source_language: &str) -> Option<Box<dyn TranslationEngine>>;
}

/// Loader for Marian models served over HTTP
pub struct MarianLoader {
    config: TranslateConfig,
    table: ModelTable,
    accelerator: Accelerator,
    client: Client,
}

impl MarianLoader {
    pub fn new(config: TranslateConfig, accelerator: Accelerator) -> Result<Self> {
        let table = ModelTable::from_config(&config);
        let client = marian::build_client(&config)?;

        Ok(Self {
            config,
            table,
            accelerator,
            client,
        })
    }

    pub fn table(&self) -> &ModelTable {
        &self.table
    }
}

#[async_trait]
impl TranslatorLoader for MarianLoader {
    async fn load(&self, source_language: &str) -> Option<Box<dyn TranslationEngine>> {
        let Some(model_id) = self.table.model_for(source_language) else {
            warn!(
                "No translation model for source language '{}' (known: {})",
                source_language,
                self.table.languages().collect::<Vec<_>>().join(", ")
            );
            return None;
        };

        let device = self.accelerator.select(self.config.device).await;
        info!("Loading translation model {} on {}", model_id, device);

        let engine = MarianEngine::new(self.client.clone(), &self.config, model_id, device);
        match engine.translate_batch(&[WARM_UP_TEXT.to_string()]).await {
            Ok(_) => {
                info!("Translation model {} is ready", model_id);
                Some(Box::new(engine))
            }
            Err(e) => {
                warn!("Failed to load translation model {}: {}", model_id, e);
                None
            }
        }
    }
}

/// Load an engine for `source_language`, retrying once with `fallback_language`
pub async fn load_with_fallback(
    loader: &dyn TranslatorLoader,
    source_language: &str,
    fallback_language: &str,
) -> Result<Box<dyn TranslationEngine>> {
    if let Some(engine) = loader.load(source_language).await {
        return Ok(engine);
    }

    if source_language != fallback_language {
        warn!(
            "No usable translation model for '{}', falling back to '{}'",
            source_language, fallback_language
        );
        if let Some(engine) = loader.load(fallback_language).await {
            return Ok(engine);
        }
    }

    Err(TransubError::NoTranslationEngine {
        language: source_language.to_string(),
        fallback: fallback_language.to_string(),
    })
}
