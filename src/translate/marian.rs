use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{TranslationEngine, TranslationOutput};
use crate::accelerator::Device;
use crate::config::TranslateConfig;
use crate::error::{Result, TransubError};

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a [String],
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
    use_gpu: bool,
}

/// Marian model hosted by an inference server that follows the Hugging Face
/// inference protocol: `POST {endpoint}/models/{model_id}` with `{"inputs": [...]}`.
pub struct MarianEngine {
    client: Client,
    url: String,
    model_id: String,
    device: Device,
    api_token: Option<String>,
}

impl MarianEngine {
    pub fn new(client: Client, config: &TranslateConfig, model_id: &str, device: Device) -> Self {
        let url = format!("{}/models/{}", config.endpoint.trim_end_matches('/'), model_id);

        Self {
            client,
            url,
            model_id: model_id.to_string(),
            device,
            api_token: config.api_token.clone(),
        }
    }
}

/// HTTP client shared by every engine the loader creates
pub fn build_client(config: &TranslateConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(TransubError::Http)
}

/// Split a server response into one output per input
pub fn parse_response(body: Value) -> Result<Vec<TranslationOutput>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(map) if map.contains_key("error") => {
            let message = map
                .get("error")
                .map(|e| match e {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            return Err(TransubError::Translation(format!("Inference server error: {}", message)));
        }
        single => vec![single],
    };

    Ok(items
        .into_iter()
        .map(|item| match item {
            // Some servers wrap each batch entry in its own list
            Value::Array(mut inner) if inner.len() == 1 => inner.remove(0),
            other => other,
        })
        .map(TranslationOutput::from_value)
        .collect())
}

#[async_trait]
impl TranslationEngine for MarianEngine {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<TranslationOutput>> {
        let request = InferenceRequest {
            inputs: texts,
            options: InferenceOptions {
                wait_for_model: true,
                use_gpu: self.device.is_gpu(),
            },
        };

        debug!("Sending {} texts to {}", texts.len(), self.url);

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransubError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TransubError::Translation(format!(
                "Model '{}' returned {}: {}",
                self.model_id, status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TransubError::Translation(format!("Failed to parse response: {}", e)))?;

        parse_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_record_list() {
        let outputs = parse_response(json!([
            {"translation_text": "واحد"},
            {"translation_text": "اثنان"}
        ]))
        .unwrap();

        let texts: Vec<String> = outputs.into_iter().map(TranslationOutput::into_text).collect();
        assert_eq!(texts, vec!["واحد", "اثنان"]);
    }

    #[test]
    fn test_parse_nested_and_mixed() {
        let outputs = parse_response(json!([
            [{"translation_text": "a"}],
            "b",
            {"unexpected": true}
        ]))
        .unwrap();

        assert_eq!(
            outputs,
            vec![
                TranslationOutput::Record {
                    translation_text: "a".to_string()
                },
                TranslationOutput::Text("b".to_string()),
                TranslationOutput::Other(json!({"unexpected": true})),
            ]
        );
    }

    #[test]
    fn test_parse_server_error() {
        let err = parse_response(json!({"error": "Model is loading"})).unwrap_err();
        assert!(err.to_string().contains("Model is loading"));
    }

    #[test]
    fn test_parse_single_object() {
        let outputs = parse_response(json!({"translation_text": "solo"})).unwrap();
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn test_request_body() {
        let inputs = vec!["Hello".to_string(), "World".to_string()];
        let request = InferenceRequest {
            inputs: &inputs,
            options: InferenceOptions {
                wait_for_model: true,
                use_gpu: false,
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "inputs": ["Hello", "World"],
                "options": {"wait_for_model": true, "use_gpu": false}
            })
        );
    }

    #[test]
    fn test_engine_url() {
        let config = TranslateConfig {
            endpoint: "http://localhost:8080/".to_string(),
            ..TranslateConfig::default()
        };
        let engine = MarianEngine::new(
            build_client(&config).unwrap(),
            &config,
            "Helsinki-NLP/opus-mt-en-ar",
            Device::Cpu,
        );

        assert_eq!(engine.url, "http://localhost:8080/models/Helsinki-NLP/opus-mt-en-ar");
        assert_eq!(engine.model_id(), "Helsinki-NLP/opus-mt-en-ar");
        assert_eq!(engine.device, Device::Cpu);
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let config = TranslateConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
            ..TranslateConfig::default()
        };
        let engine = MarianEngine::new(
            build_client(&config).unwrap(),
            &config,
            "Helsinki-NLP/opus-mt-en-ar",
            Device::Cpu,
        );

        let err = engine.translate_batch(&["Hello".to_string()]).await.unwrap_err();
        assert!(matches!(err, TransubError::Translation(_)));
    }
}
