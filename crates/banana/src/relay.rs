//! The relay between the interface and the upstream completion service.
//!
//! A [`Relay`] is assembled per request and keeps no state between requests. It
//! builds the system prompt (optionally grounded with web search results), forwards
//! the conversation upstream with streaming enabled, and reshapes the upstream SSE
//! body into [`StreamEvent`]s one delta at a time.
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::{json, Value};

use crate::codec::{LineDecoder, DATA_PREFIX, DONE_SENTINEL};
use crate::errors::RelayError;
use crate::intent::detect_search_intent;
use crate::models::event::StreamEvent;
use crate::models::message::Message;
use crate::models::role::Role;
use crate::prompt_template::load_prompt_file;
use crate::providers::base::{ByteStream, Provider};
use crate::providers::configs::RelayConfig;
use crate::providers::factory;
use crate::search::{BraveSearch, SearchProvider, DEFAULT_RESULT_COUNT};

/// Events ready to be written to the consumer, in upstream order
pub type EventStream = BoxStream<'static, Result<StreamEvent, RelayError>>;

/// What a single upstream line turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamLine {
    Delta(String),
    Done,
    Ignored,
}

/// Classify one complete line of the upstream SSE body
pub fn parse_upstream_line(line: &str) -> Result<UpstreamLine, serde_json::Error> {
    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(UpstreamLine::Ignored);
    };
    if data.trim() == DONE_SENTINEL {
        return Ok(UpstreamLine::Done);
    }

    let parsed: Value = serde_json::from_str(data)?;
    match parsed["choices"][0]["delta"]["content"].as_str() {
        Some(content) if !content.is_empty() => Ok(UpstreamLine::Delta(content.to_string())),
        _ => Ok(UpstreamLine::Ignored),
    }
}

/// Reshape a raw upstream body into text-delta events.
///
/// Every delta is yielded as soon as its line is complete. Malformed lines are logged
/// and skipped. If the upstream fails mid-body the error is yielded and the stream ends.
pub fn relay_events(mut upstream: ByteStream) -> EventStream {
    Box::pin(async_stream::stream! {
        let mut decoder = LineDecoder::new();

        while let Some(chunk) = upstream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::error!("Stream reading error: {}", e);
                    yield Err(e);
                    return;
                }
            };

            for line in decoder.push(&chunk) {
                match parse_upstream_line(&line) {
                    Ok(UpstreamLine::Delta(text)) => yield Ok(StreamEvent::text_delta(text)),
                    Ok(UpstreamLine::Done) | Ok(UpstreamLine::Ignored) => {}
                    Err(e) => tracing::warn!("Failed to parse upstream chunk: {}", e),
                }
            }
        }

        if let Some(rest) = decoder.finish() {
            tracing::debug!("Dropping unterminated upstream line ({} bytes)", rest.len());
        }
    })
}

/// Relay integrates the completion provider with the optional search step
pub struct Relay {
    provider: Box<dyn Provider + Send + Sync>,
    search: Option<Box<dyn SearchProvider>>,
    search_count: usize,
}

impl Relay {
    pub fn new(provider: Box<dyn Provider + Send + Sync>) -> Self {
        Self {
            provider,
            search: None,
            search_count: DEFAULT_RESULT_COUNT,
        }
    }

    /// Ground answers with up to `count` web results when a message asks for them
    pub fn with_search(mut self, search: Box<dyn SearchProvider>, count: usize) -> Self {
        self.search = Some(search);
        self.search_count = count;
        self
    }

    /// Build a relay from configuration; fails before any network call when the
    /// completion credential is missing
    pub fn from_config(config: RelayConfig) -> Result<Self, RelayError> {
        let relay = Self::new(factory::get_provider(config.provider)?);

        if config.search.api_key.is_none() {
            return Ok(relay);
        }
        let count = config.search.count;
        match BraveSearch::new(config.search) {
            Ok(search) => Ok(relay.with_search(Box::new(search), count)),
            Err(e) => {
                tracing::warn!("Web search disabled: {}", e);
                Ok(relay)
            }
        }
    }

    /// The system message for this conversation, with search results appended when
    /// the latest user message asks for current information and the search succeeds
    pub async fn system_prompt(&self, messages: &[Message]) -> Result<String, RelayError> {
        let mut system = load_prompt_file("system.md", &json!({}))
            .map_err(|e| RelayError::Internal(e.to_string()))?
            .trim_end()
            .to_string();

        let Some(last_user) = messages.iter().rev().find(|m| m.role == Role::User) else {
            return Ok(system);
        };

        let intent = detect_search_intent(&last_user.joined_text(" "));
        if !intent.needs_search {
            return Ok(system);
        }

        let Some(search) = &self.search else {
            tracing::debug!("Search requested for {:?} but no search provider is configured", intent.query);
            return Ok(system);
        };

        tracing::info!("Performing web search for: {}", intent.query);
        match search.search(&intent.query, self.search_count).await {
            Ok(results) if !results.is_empty() => {
                let rendered = load_prompt_file(
                    "search_results.md",
                    &json!({ "query": intent.query, "results": results }),
                )
                .map_err(|e| RelayError::Internal(e.to_string()))?;
                system.push_str(rendered.trim_end());
            }
            Ok(_) => tracing::info!("Search for {:?} returned no results", intent.query),
            Err(e) => tracing::warn!("Search for {:?} failed, continuing without it: {}", intent.query, e),
        }

        Ok(system)
    }

    /// Start relaying one conversational turn
    pub async fn reply(&self, messages: &[Message]) -> Result<EventStream, RelayError> {
        tracing::info!("Processing chatbot request with {} messages", messages.len());

        let system = self.system_prompt(messages).await?;
        let upstream = self.provider.stream(&system, messages).await?;
        Ok(relay_events(upstream))
    }
}
