//! Client side of the relay protocol.
//!
//! The consumer reads the relay's body, frames it into lines, decodes every event it
//! recognizes and folds the deltas into one growing string, publishing the string
//! after each delta so a caller can render partial output.
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt::Display;

use crate::codec::{LineDecoder, DATA_PREFIX, DONE_SENTINEL, LEGACY_PREFIX};
use crate::errors::StreamError;
use crate::models::message::Message;

pub const GENERIC_FAILURE: &str = "Failed to generate result";

/// Extract the text delta carried by one relay line, if any.
///
/// Both wire formats are accepted: `data: {"type":"text-delta","textDelta":…}` and the
/// legacy `0:{"parts":[{"text":…}]}`. Lines in neither format carry no text.
pub fn parse_relay_line(line: &str) -> Result<Option<String>, serde_json::Error> {
    if let Some(data) = line.strip_prefix(DATA_PREFIX) {
        let data = data.trim();
        if data.is_empty() || data == DONE_SENTINEL {
            return Ok(None);
        }
        let parsed: Value = serde_json::from_str(data)?;
        if parsed["type"] == "text-delta" {
            if let Some(delta) = non_empty(&parsed["textDelta"]) {
                return Ok(Some(delta));
            }
        }
        return Ok(first_part_text(&parsed));
    }

    if let Some(frame) = line.strip_prefix(LEGACY_PREFIX) {
        let parsed: Value = serde_json::from_str(frame)?;
        return Ok(first_part_text(&parsed));
    }

    Ok(None)
}

fn first_part_text(value: &Value) -> Option<String> {
    non_empty(&value["parts"][0]["text"])
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The text accumulated for one request
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Accumulator {
    text: String,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delta and return the text so far
    pub fn push(&mut self, delta: &str) -> &str {
        self.text.push_str(delta);
        &self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Freeze the text; a stream that produced nothing is an error, not an empty answer
    pub fn finish(self) -> Result<String, StreamError> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            Err(StreamError::EmptyResult)
        } else {
            Ok(trimmed.to_string())
        }
    }

    pub fn into_partial(self) -> String {
        self.text
    }
}

/// Drive a relay body to completion.
///
/// `on_update` receives the accumulated text after every delta and once more with the
/// trimmed final value. On a body error the text published so far is returned inside
/// [`StreamError::Interrupted`] so callers can show it as incomplete.
pub async fn consume<S, E, F>(body: S, mut on_update: F) -> Result<String, StreamError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
    F: FnMut(&str),
{
    let mut body = Box::pin(body);
    let mut decoder = LineDecoder::new();
    let mut accumulated = Accumulator::new();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::error!("Stream reading error after {} bytes of text: {}", accumulated.as_str().len(), e);
                return Err(StreamError::Interrupted {
                    partial: accumulated.into_partial(),
                    reason: e.to_string(),
                });
            }
        };

        for line in decoder.push(&chunk) {
            match parse_relay_line(&line) {
                Ok(Some(delta)) => on_update(accumulated.push(&delta)),
                Ok(None) => {}
                Err(e) => {
                    let preview: String = line.chars().take(100).collect();
                    tracing::warn!("Failed to parse stream line {:?}: {}", preview, e);
                }
            }
        }
    }

    if let Some(rest) = decoder.finish() {
        tracing::debug!("Dropping unterminated stream line ({} bytes)", rest.len());
    }

    let text = accumulated.finish()?;
    tracing::debug!("Stream reading completed. Final text length: {}", text.len());
    on_update(&text);
    Ok(text)
}

/// HTTP client for the relay endpoint
pub struct RelayClient {
    client: Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `prompt` as the single user message of a fresh conversation and stream
    /// the answer into `on_update`
    pub async fn generate<F>(&self, prompt: &str, on_update: F) -> Result<String, StreamError>
    where
        F: FnMut(&str),
    {
        self.reply(&[Message::user().with_text(prompt)], on_update)
            .await
    }

    /// Send the whole conversation so far and stream the next assistant turn into
    /// `on_update`
    pub async fn reply<F>(&self, messages: &[Message], on_update: F) -> Result<String, StreamError>
    where
        F: FnMut(&str),
    {
        let body = json!({ "messages": messages });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| StreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body["error"].as_str().map(str::to_string))
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            tracing::error!("API Error: {}", message);
            return Err(StreamError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        consume(response.bytes_stream(), on_update).await
    }
}
