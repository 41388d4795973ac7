//! Line framing and event formatting shared by the relay and the consumer.
use bytes::{Buf, BytesMut};
use serde_json::json;
use std::str::FromStr;

use crate::models::event::StreamEvent;

/// Prefix of SSE-style data lines, both upstream and on our own wire
pub const DATA_PREFIX: &str = "data: ";
/// Prefix of the legacy text frame
pub const LEGACY_PREFIX: &str = "0:";
/// Payload the upstream sends once it has no more deltas
pub const DONE_SENTINEL: &str = "[DONE]";

/// Splits an incoming byte stream into complete lines.
///
/// Bytes are held until a newline arrives and only whole lines are decoded, so a
/// multi-byte character split across reads is decoded once both halves are present.
/// At most one incomplete line is buffered between pushes.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: BytesMut,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk and return every line it completed, in order
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(pos);
            self.buffer.advance(1);
            lines.push(decode_line(&line));
        }
        lines
    }

    /// Bytes received after the last newline
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Consume the decoder, returning the unterminated remainder if any
    pub fn finish(self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(decode_line(&self.buffer))
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Wire format the relay writes its events in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamFormat {
    /// `data: {"type":"text-delta","textDelta":…}` followed by a blank line
    #[default]
    Data,
    /// `0:{"parts":[{"text":…}]}`
    Legacy,
}

impl FromStr for StreamFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "data" => Ok(StreamFormat::Data),
            "legacy" => Ok(StreamFormat::Legacy),
            other => Err(format!("Unknown stream format: {}", other)),
        }
    }
}

// Protocol-specific event formatting
pub struct ProtocolFormatter;

impl ProtocolFormatter {
    pub fn format(format: StreamFormat, event: &StreamEvent) -> String {
        match format {
            StreamFormat::Data => Self::format_data(event),
            StreamFormat::Legacy => Self::format_legacy(&event.text_delta),
        }
    }

    fn format_data(event: &StreamEvent) -> String {
        let encoded = serde_json::to_string(event).unwrap_or_default();
        format!("{}{}\n\n", DATA_PREFIX, encoded)
    }

    fn format_legacy(text: &str) -> String {
        let frame = json!({ "parts": [{ "text": text }] });
        format!("{}{}\n", LEGACY_PREFIX, frame)
    }
}
