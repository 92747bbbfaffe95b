//! Upstream inference backend interface.

use async_trait::async_trait;
use bedrock_relay_error::InvocationError;
use bytes::Bytes;
use derive_getters::Getters;
use futures_util::stream::BoxStream;

/// A serialized request ready to send to the upstream model API.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ModelInvocation {
    /// Upstream model identifier
    model_id: String,
    /// MIME type of `body`
    #[builder(default = "\"application/json\".to_string()")]
    content_type: String,
    /// Desired MIME type of response chunks
    #[builder(default = "\"application/json\".to_string()")]
    accept: String,
    /// Serialized request payload
    body: Bytes,
}

impl ModelInvocation {
    /// Returns a builder for constructing a ModelInvocation.
    pub fn builder() -> ModelInvocationBuilder {
        ModelInvocationBuilder::default()
    }
}

/// One framed event from the upstream response stream.
///
/// End of stream is signalled by the stream itself returning `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamEvent {
    /// Opaque chunk payload, normally a JSON-encoded delta.
    Chunk(Bytes),
    /// An event variant this client does not recognize.
    Unrecognized {
        /// Diagnostic tag describing the event
        tag: String,
    },
}

/// Lazy sequence of upstream events.
pub type UpstreamStream = BoxStream<'static, Result<UpstreamEvent, InvocationError>>;

/// Upstream model API that streams its response.
///
/// Implementations are built once at start-up and shared across requests,
/// so they must be usable concurrently through `&self`.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Short provider name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Sends the invocation and returns the response event stream.
    ///
    /// Resolves once the upstream has accepted the call; events are then
    /// pulled lazily from the returned stream.
    async fn invoke_stream(
        &self,
        invocation: ModelInvocation,
    ) -> Result<UpstreamStream, InvocationError>;
}
