//! Response chunk decoding.

use bedrock_relay_core::{GenerationInput, GenerationRequest, ResponseChunk};
use bedrock_relay_error::DecodeError;
use serde::Deserialize;

/// Chunk payload of a legacy text-completion stream.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChunk {
    /// Generated text since the previous chunk
    #[serde(default)]
    pub completion: String,
    /// Set on the final chunk
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Chunk payload of a messages API stream.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesEvent {
    /// Event type, e.g. `content_block_delta` or `message_stop`
    #[serde(rename = "type")]
    pub kind: String,
    /// Content block index
    #[serde(default)]
    pub index: Option<u32>,
    /// Delta carried by `*_delta` events
    #[serde(default)]
    pub delta: Option<EventDelta>,
}

/// Delta body of a messages API event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDelta {
    /// Delta type, e.g. `text_delta`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Text fragment for `text_delta`
    #[serde(default)]
    pub text: Option<String>,
}

/// Format of upstream chunk payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PayloadFormat {
    /// `{"completion": "..."}` chunks
    TextCompletion,
    /// Typed messages API events
    Messages,
}

impl PayloadFormat {
    /// The chunk format a request will be answered in.
    pub fn of(request: &GenerationRequest) -> Self {
        match request.input() {
            GenerationInput::Prompt(_) => PayloadFormat::TextCompletion,
            GenerationInput::Messages(_) => PayloadFormat::Messages,
        }
    }

    /// Decodes one chunk payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedrock_relay_core::ResponseChunk;
    /// use bedrock_relay_models::PayloadFormat;
    ///
    /// let chunk = PayloadFormat::Messages
    ///     .decode_chunk(br#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Here"}}"#)
    ///     .unwrap();
    /// assert_eq!(chunk, ResponseChunk::TextDelta("Here".into()));
    /// ```
    pub fn decode_chunk(self, payload: &[u8]) -> Result<ResponseChunk, DecodeError> {
        match self {
            PayloadFormat::TextCompletion => {
                let chunk: CompletionChunk = serde_json::from_slice(payload).map_err(|e| {
                    DecodeError::new(format!("Invalid completion chunk: {}", e))
                })?;
                Ok(ResponseChunk::TextDelta(chunk.completion))
            }
            PayloadFormat::Messages => {
                let event: MessagesEvent = serde_json::from_slice(payload).map_err(|e| {
                    DecodeError::new(format!("Invalid messages event: {}", e))
                })?;
                match (event.kind.as_str(), event.delta.and_then(|d| d.text)) {
                    ("content_block_delta", Some(text)) => Ok(ResponseChunk::TextDelta(text)),
                    _ => Ok(ResponseChunk::Unknown(event.kind)),
                }
            }
        }
    }
}
