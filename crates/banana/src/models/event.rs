use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    TextDelta,
}

/// One relay-to-consumer event, carrying a single non-empty text delta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub text_delta: String,
}

impl StreamEvent {
    pub fn text_delta<S: Into<String>>(text: S) -> Self {
        Self {
            event_type: EventType::TextDelta,
            text_delta: text.into(),
        }
    }
}
