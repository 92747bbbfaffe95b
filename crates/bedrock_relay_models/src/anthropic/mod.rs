//! Anthropic-on-Bedrock request payloads and response chunk decoding.

mod chunk;
mod payload;

pub use chunk::{CompletionChunk, EventDelta, MessagesEvent, PayloadFormat};
pub use payload::{DEFAULT_ANTHROPIC_VERSION, LegacyPayload, MessagesPayload, encode_invocation};
