use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use futures::StreamExt;
use std::sync::{Arc, Mutex};

use crate::errors::RelayError;
use crate::models::message::Message;
use crate::providers::base::{ByteStream, Provider};

/// What the mock provider was asked to complete
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub system: String,
    pub messages: Vec<Message>,
}

/// A mock provider that replays pre-configured upstream chunks for testing
pub struct MockProvider {
    chunks: Vec<Result<Bytes, RelayError>>,
    rejection: Option<RelayError>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider replaying `chunks` verbatim
    pub fn new<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            chunks: chunks.into_iter().map(|c| Ok(c.into())).collect(),
            rejection: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail the stream with `error` after the configured chunks
    pub fn then_fail(mut self, error: RelayError) -> Self {
        self.chunks.push(Err(error));
        self
    }

    /// Refuse to start the stream at all
    pub fn rejecting(error: RelayError) -> Self {
        Self {
            chunks: Vec::new(),
            rejection: Some(error),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<RecordedRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn stream(&self, system: &str, messages: &[Message]) -> Result<ByteStream, RelayError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            system: system.to_string(),
            messages: messages.to_vec(),
        });

        if let Some(error) = &self.rejection {
            return Err(error.clone());
        }
        Ok(stream::iter(self.chunks.clone()).boxed())
    }
}
