use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{ByteStream, Provider};
use super::configs::OpenAiProviderConfig;
use super::utils::{extract_error_message, messages_to_openai_spec};
use crate::errors::RelayError;
use crate::models::message::Message;

pub const MISSING_KEY_MESSAGE: &str =
    "OpenAI API key is not configured. Please set OPENAI_API_KEY in your environment variables.";

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self, RelayError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RelayError::Configuration(MISSING_KEY_MESSAGE.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()
            .map_err(|e| RelayError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    fn payload(&self, system: &str, messages: &[Message]) -> Value {
        // create messages array with system message first
        let mut messages_array = vec![json!({
            "role": "system",
            "content": system
        })];
        messages_array.extend(messages_to_openai_spec(messages));

        json!({
            "model": self.config.model,
            "messages": messages_array,
            "stream": true,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }

    async fn post(&self, payload: Value) -> Result<reqwest::Response, RelayError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("OpenAI API error ({}): {}", status, body);
        Err(RelayError::UpstreamRejection {
            status: status.as_u16(),
            message: extract_error_message(&body),
        })
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn stream(&self, system: &str, messages: &[Message]) -> Result<ByteStream, RelayError> {
        let payload = self.payload(system, messages);
        tracing::info!(
            "Sending request to OpenAI with {} messages",
            payload["messages"].as_array().map_or(0, Vec::len)
        );

        let response = self.post(payload).await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| RelayError::UpstreamStream(e.to_string())))
            .boxed())
    }
}
