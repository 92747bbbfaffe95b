//! Channel-backed client sink.

use async_trait::async_trait;
use bedrock_relay_error::WriteError;
use bedrock_relay_interface::ChunkSink;
use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc;
use tracing::debug;

/// Item type carried to the response body.
pub type BodyItem = Result<Bytes, std::io::Error>;

/// Creates a sink and the receiver feeding the response body.
///
/// With `flush_each` unset the sink runs in degraded mode: all output is
/// sent as one frame when the relay closes.
pub fn channel_sink(capacity: usize, flush_each: bool) -> (ChannelSink, mpsc::Receiver<BodyItem>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let sink = ChannelSink {
        sender,
        pending: BytesMut::new(),
        flush_each,
    };
    (sink, receiver)
}

/// Sends each flushed batch of text as one frame over a bounded channel.
///
/// A closed receiver means the client is gone; every later write fails.
#[derive(Debug)]
pub struct ChannelSink {
    sender: mpsc::Sender<BodyItem>,
    pending: BytesMut,
    flush_each: bool,
}

impl ChannelSink {
    /// Ends the body with an error so the client sees an aborted response.
    pub async fn abort(self, message: impl Into<String>) {
        let message = message.into();
        if self
            .sender
            .send(Err(std::io::Error::other(message)))
            .await
            .is_err()
        {
            debug!("Client already disconnected before abort");
        }
    }
}

#[async_trait]
impl ChunkSink for ChannelSink {
    async fn write(&mut self, fragment: &str) -> Result<(), WriteError> {
        if self.sender.is_closed() {
            return Err(WriteError::new("client disconnected"));
        }
        self.pending.extend_from_slice(fragment.as_bytes());
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), WriteError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let frame = self.pending.split().freeze();
        self.sender
            .send(Ok(frame))
            .await
            .map_err(|_| WriteError::new("client disconnected"))
    }

    fn supports_flush(&self) -> bool {
        self.flush_each
    }
}
