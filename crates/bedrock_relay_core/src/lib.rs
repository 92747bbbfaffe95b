//! Core data types for the bedrock-relay streaming proxy.
//!
//! These types are request-scoped: they are built when an HTTP request
//! arrives and dropped when its response completes.

mod chunk;
mod content;
mod message;
mod request;
mod role;

pub use chunk::ResponseChunk;
pub use content::{ContentPart, ImageSource};
pub use message::ChatMessage;
pub use request::{GenerationInput, GenerationRequest, GenerationRequestBuilder};
pub use role::Role;
