//! Together API Provider
//!
//! Chat-completion client for the Together inference endpoint.
//! One request per call, `stream: false`, first choice only.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{CompletionRequest, InferenceProvider};
use crate::config::InferenceConfig;
use crate::constants::network;
use crate::types::{Result, TinteroError};

/// Together API provider with secure API key handling
pub struct TogetherProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for TogetherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TogetherProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl TogetherProvider {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .clone()
            .or_else(|| std::env::var("TOGETHER_API_KEY").ok())
            .ok_or_else(|| {
                TinteroError::MissingCredential(
                    "Together API key not found. Set TOGETHER_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                TinteroError::transport("client setup", format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            client,
        })
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            top_k: request.params.top_k,
            repetition_penalty: request.params.repetition_penalty,
            stop: request.params.stop.clone(),
            stream: false,
        }
    }
}

#[async_trait]
impl InferenceProvider for TogetherProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        info!(
            "Requesting completion (model: {}, max_tokens: {})",
            self.model, request.params.max_tokens
        );

        let body = self.build_request(&request);
        let url = format!("{}/chat/completions", self.api_base);

        debug!("Sending request to {}", url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TinteroError::from_reqwest("chat completion", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TinteroError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let response_body: ChatCompletionResponse = response.json().await.map_err(|e| {
            TinteroError::MalformedResponse(format!("response is not valid JSON: {}", e))
        })?;

        extract_content(response_body)
    }

    fn name(&self) -> &str {
        "together"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Pull the first choice's message content out of a parsed response.
/// The `choices[0].message.content` path is the sole field consumed.
fn extract_content(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| {
            TinteroError::MalformedResponse("no message content in first choice".to_string())
        })
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repetition_penalty: f32,
    stop: Vec<String>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::SamplingParams;

    fn provider() -> TogetherProvider {
        let config = InferenceConfig {
            api_key: Some("test-key".to_string()),
            ..InferenceConfig::default()
        };
        TogetherProvider::new(&config).unwrap()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        // Guard against ambient credentials leaking into the test
        if std::env::var("TOGETHER_API_KEY").is_ok() {
            return;
        }
        let config = InferenceConfig::default();
        let err = TogetherProvider::new(&config).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, TinteroError::MissingCredential(_)));
    }

    #[test]
    fn test_request_wire_format() {
        let provider = provider();
        let request = CompletionRequest::new("sistema", "usuario", SamplingParams::analysis());
        let wire = provider.build_request(&request);

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["model"], "mistralai/Mixtral-8x7B-Instruct-v0.1");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "sistema");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 2000);
        assert_eq!(json["top_k"], 50);
        assert_eq!(json["repetition_penalty"], 1.0);
        assert_eq!(json["stop"][0], "<|eot_id|>");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_extract_content_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                {"message": {"content": "primera"}},
                {"message": {"content": "segunda"}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_content(response).unwrap(), "primera");
    }

    #[test]
    fn test_extract_content_missing_path() {
        let empty: ChatCompletionResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(matches!(
            extract_content(empty),
            Err(TinteroError::MalformedResponse(_))
        ));

        let null_content: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"content": null}}]
        }))
        .unwrap();
        assert!(matches!(
            extract_content(null_content),
            Err(TinteroError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = provider();
        let debugged = format!("{:?}", provider);
        assert!(!debugged.contains("test-key"));
        assert!(debugged.contains("REDACTED"));
    }
}
