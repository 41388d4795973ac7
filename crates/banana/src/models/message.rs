use super::role::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// One ordered piece of a message
pub enum ContentPart {
    Text {
        #[serde(default)]
        text: String,
    },
    /// Any part kind we don't render; it carries no text
    #[serde(other)]
    Other,
}

impl ContentPart {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            ContentPart::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single conversational turn as the interface sends it
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

impl Message {
    pub fn new(role: Role) -> Self {
        Message {
            role,
            parts: Vec::new(),
        }
    }

    pub fn user() -> Self {
        Self::new(Role::User)
    }

    pub fn assistant() -> Self {
        Self::new(Role::Assistant)
    }

    pub fn system() -> Self {
        Self::new(Role::System)
    }

    /// Add any part to the message
    pub fn with_part(mut self, part: ContentPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_part(ContentPart::text(text))
    }

    /// Text parts joined in order with `separator`
    pub fn joined_text(&self, separator: &str) -> String {
        self.parts
            .iter()
            .filter_map(ContentPart::as_text)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// The display text of the message
    pub fn text(&self) -> String {
        self.joined_text("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_concatenates_parts_in_order() {
        let message = Message::user().with_text("Hello, ").with_text("world");
        assert_eq!(message.text(), "Hello, world");
        assert_eq!(message.joined_text(" "), "Hello,  world");
    }

    #[test]
    fn test_deserialize_ui_message() {
        let value = json!({
            "role": "user",
            "parts": [
                {"type": "text", "text": "first"},
                {"type": "step-start"},
                {"type": "text", "text": "second"}
            ]
        });

        let message: Message = serde_json::from_value(value).unwrap();
        assert_eq!(message.role, Role::User);
        assert_eq!(message.parts.len(), 3);
        assert_eq!(message.parts[1], ContentPart::Other);
        assert_eq!(message.text(), "firstsecond");
    }

    #[test]
    fn test_serialize_matches_wire_shape() {
        let message = Message::user().with_text("hi");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"role": "user", "parts": [{"type": "text", "text": "hi"}]})
        );
    }
}
