//! Relay state machine.

use bedrock_relay_core::ResponseChunk;
use bedrock_relay_error::{InvocationError, RelayResult, WriteError};
use bedrock_relay_interface::{ChunkSink, UpstreamEvent};
use bedrock_relay_models::PayloadFormat;
use derive_getters::Getters;
use futures_util::{Stream, StreamExt};
use tracing::{debug, error, info, instrument, trace, warn};

/// Lifecycle of a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RelayState {
    /// Forwarding upstream events as they arrive.
    Streaming,
    /// Upstream signalled end of stream; final flush pending.
    Draining,
    /// Downstream flushed (or failed) and the relay has returned.
    Closed,
}

/// Counters describing a finished (or in-progress) relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct RelaySummary {
    /// Text fragments written to the client
    fragments: u64,
    /// UTF-8 bytes written to the client
    bytes: u64,
    /// Events that carried no client-visible text
    unknown_events: u64,
    /// Chunks whose payload failed to decode
    skipped_chunks: u64,
    /// State when the summary was taken
    state: RelayState,
}

/// Copies text deltas from an upstream event stream to a client sink.
///
/// Fragments are written in arrival order and flushed one by one. A chunk
/// that fails to decode is logged and skipped; an upstream stream error or a
/// sink write failure ends the relay.
///
/// # Examples
///
/// ```no_run
/// # async fn example(
/// #     events: bedrock_relay_interface::UpstreamStream,
/// #     sink: &mut bedrock_relay_stream::ChannelSink,
/// # ) -> bedrock_relay_error::RelayResult<()> {
/// use bedrock_relay_models::PayloadFormat;
/// use bedrock_relay_stream::Relay;
///
/// let summary = Relay::new(PayloadFormat::Messages).run(events, sink).await?;
/// println!("relayed {} fragments", summary.fragments());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Relay {
    format: PayloadFormat,
    state: RelayState,
    fragments: u64,
    bytes: u64,
    unknown_events: u64,
    skipped_chunks: u64,
}

impl Relay {
    /// Creates a relay decoding chunks in the given format.
    pub fn new(format: PayloadFormat) -> Self {
        Self {
            format,
            state: RelayState::Streaming,
            fragments: 0,
            bytes: 0,
            unknown_events: 0,
            skipped_chunks: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> RelayState {
        self.state
    }

    /// Snapshot of the counters.
    pub fn summary(&self) -> RelaySummary {
        RelaySummary {
            fragments: self.fragments,
            bytes: self.bytes,
            unknown_events: self.unknown_events,
            skipped_chunks: self.skipped_chunks,
            state: self.state,
        }
    }

    /// Runs the relay until the upstream stream ends or fails.
    ///
    /// Dropping the upstream stream on return releases the upstream call,
    /// so a client disconnect (write failure) aborts generation.
    ///
    /// # Errors
    ///
    /// An `Invocation` error when the upstream stream fails, a `Write` error
    /// when the sink rejects a write or flush. The relay is `Closed` either way.
    #[instrument(skip_all, fields(format = %self.format))]
    pub async fn run<S, K>(&mut self, mut events: S, sink: &mut K) -> RelayResult<RelaySummary>
    where
        S: Stream<Item = Result<UpstreamEvent, InvocationError>> + Unpin,
        K: ChunkSink + ?Sized,
    {
        let flush_each = sink.supports_flush();
        if !flush_each {
            debug!("Sink cannot flush incrementally; output is buffered until close");
        }

        while let Some(event) = events.next().await {
            match event {
                Ok(UpstreamEvent::Chunk(payload)) => match self.format.decode_chunk(&payload) {
                    Ok(ResponseChunk::TextDelta(text)) => {
                        self.forward(&text, sink, flush_each).await?;
                    }
                    Ok(ResponseChunk::Unknown(tag)) => {
                        self.unknown_events += 1;
                        trace!(tag = %tag, "Event carries no text");
                    }
                    Err(e) => {
                        self.skipped_chunks += 1;
                        warn!(error = %e, payload_len = payload.len(), "Skipping malformed chunk");
                    }
                },
                Ok(UpstreamEvent::Unrecognized { tag }) => {
                    self.unknown_events += 1;
                    warn!(tag = %tag, "Unrecognized upstream event");
                }
                Err(e) => {
                    self.state = RelayState::Closed;
                    error!(error = %e, fragments = self.fragments, "Upstream stream failed");
                    return Err(e.into());
                }
            }
        }

        self.state = RelayState::Draining;
        debug!("Upstream stream ended");

        let flushed = sink.flush().await;
        self.state = RelayState::Closed;
        flushed?;

        info!(
            fragments = self.fragments,
            bytes = self.bytes,
            unknown_events = self.unknown_events,
            skipped_chunks = self.skipped_chunks,
            "Relay complete"
        );
        Ok(self.summary())
    }

    async fn forward<K>(&mut self, text: &str, sink: &mut K, flush: bool) -> RelayResult<()>
    where
        K: ChunkSink + ?Sized,
    {
        if text.is_empty() {
            return Ok(());
        }

        if let Err(e) = write_fragment(sink, text, flush).await {
            self.state = RelayState::Closed;
            info!(error = %e, fragments = self.fragments, "Client write failed; stopping relay");
            return Err(e.into());
        }

        self.fragments += 1;
        self.bytes += text.len() as u64;
        Ok(())
    }
}

async fn write_fragment<K>(sink: &mut K, text: &str, flush: bool) -> Result<(), WriteError>
where
    K: ChunkSink + ?Sized,
{
    sink.write(text).await?;
    if flush {
        sink.flush().await?;
    }
    Ok(())
}
