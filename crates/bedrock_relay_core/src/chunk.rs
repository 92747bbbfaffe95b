//! Decoded upstream response chunks.

/// One decoded unit of a streaming response.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ResponseChunk {
    /// Incremental generated text.
    #[display("{_0}")]
    TextDelta(String),
    /// An event carrying no client-visible text, identified by its tag.
    #[display("<{_0}>")]
    Unknown(String),
}

impl ResponseChunk {
    /// Text to forward to the client; empty for [`ResponseChunk::Unknown`].
    pub fn text(&self) -> &str {
        match self {
            ResponseChunk::TextDelta(text) => text,
            ResponseChunk::Unknown(_) => "",
        }
    }
}
