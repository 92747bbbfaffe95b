//! Streaming response relay.
//!
//! [`Relay`] copies text deltas from an upstream event stream to a
//! [`ChunkSink`](bedrock_relay_interface::ChunkSink), one flush per fragment.
//! [`ChannelSink`] adapts a tokio channel so the receiving half can serve as
//! an HTTP response body.

mod channel;
mod relay;

pub use channel::{BodyItem, ChannelSink, channel_sink};
pub use relay::{Relay, RelayState, RelaySummary};
