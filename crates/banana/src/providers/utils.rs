use serde_json::{json, Value};

use crate::models::message::Message;

pub const GENERIC_UPSTREAM_ERROR: &str = "OpenAI API error";

/// Flatten messages into OpenAI's `{role, content}` chat format.
///
/// Text parts are concatenated without a separator; messages whose text is blank
/// are dropped.
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .filter_map(|message| {
            let content = message.text();
            if content.trim().is_empty() {
                return None;
            }
            Some(json!({
                "role": message.role.as_str(),
                "content": content,
            }))
        })
        .collect()
}

/// Best-effort human readable message from an upstream error body
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value["error"]["message"].as_str().filter(|m| !m.is_empty()) {
            return message.to_string();
        }
    }

    if body.trim().is_empty() {
        GENERIC_UPSTREAM_ERROR.to_string()
    } else {
        body.to_string()
    }
}
