//! Downstream client connection interface.

use async_trait::async_trait;
use bedrock_relay_error::WriteError;

/// A client connection accepting incremental writes.
#[async_trait]
pub trait ChunkSink: Send {
    /// Appends a text fragment to the pending output.
    async fn write(&mut self, fragment: &str) -> Result<(), WriteError>;

    /// Pushes pending output to the client.
    async fn flush(&mut self) -> Result<(), WriteError>;

    /// Whether [`flush`](ChunkSink::flush) delivers output immediately.
    ///
    /// Sinks returning `false` only receive a single flush when the stream
    /// closes.
    fn supports_flush(&self) -> bool {
        true
    }
}
