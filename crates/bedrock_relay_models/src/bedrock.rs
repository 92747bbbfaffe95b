//! Amazon Bedrock runtime backend.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client as BedrockRuntimeClient;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::types::ResponseStream;
use bedrock_relay_error::{InvocationError, InvocationErrorKind};
use bedrock_relay_interface::{InferenceBackend, ModelInvocation, UpstreamEvent, UpstreamStream};
use bytes::Bytes;
use futures_util::StreamExt;
use tracing::{debug, error, info, instrument, warn};

/// Streams model invocations through `InvokeModelWithResponseStream`.
///
/// Credentials and request signing are handled by the AWS SDK. The client is
/// cheap to clone and safe to share between concurrent requests.
#[derive(Debug, Clone)]
pub struct BedrockBackend {
    client: BedrockRuntimeClient,
}

impl BedrockBackend {
    /// Creates a backend from the ambient AWS configuration.
    ///
    /// `region` takes precedence over the environment and profile region;
    /// `us-east-1` is used when neither is set.
    #[instrument(skip_all, fields(region = ?region))]
    pub async fn from_env(region: Option<String>) -> Self {
        let region_provider = RegionProviderChain::first_try(region.map(Region::new))
            .or_default_provider()
            .or_else("us-east-1");
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        info!(
            region = ?config.region(),
            "Created Bedrock runtime client"
        );
        Self::with_client(BedrockRuntimeClient::new(&config))
    }

    /// Creates a backend around an existing client.
    pub fn with_client(client: BedrockRuntimeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InferenceBackend for BedrockBackend {
    fn name(&self) -> &'static str {
        "bedrock"
    }

    #[instrument(skip(self, invocation), fields(model = %invocation.model_id()))]
    async fn invoke_stream(
        &self,
        invocation: ModelInvocation,
    ) -> Result<UpstreamStream, InvocationError> {
        debug!(bytes = invocation.body().len(), "Invoking model with response stream");

        let output = self
            .client
            .invoke_model_with_response_stream()
            .model_id(invocation.model_id())
            .content_type(invocation.content_type())
            .accept(invocation.accept())
            .body(Blob::new(invocation.body().to_vec()))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(error = %message, "Bedrock invocation failed");
                InvocationError::new(InvocationErrorKind::Call, message)
            })?;

        let mut receiver = output.body;
        let stream = async_stream::stream! {
            loop {
                match receiver.recv().await {
                    Ok(Some(ResponseStream::Chunk(part))) => {
                        let payload = part.bytes.map(Blob::into_inner).unwrap_or_default();
                        yield Ok(UpstreamEvent::Chunk(Bytes::from(payload)));
                    }
                    Ok(Some(other)) => {
                        let tag = if other.is_unknown() {
                            "unknown".to_string()
                        } else {
                            format!("{:?}", other)
                        };
                        yield Ok(UpstreamEvent::Unrecognized { tag });
                    }
                    Ok(None) => {
                        debug!("Bedrock response stream ended");
                        break;
                    }
                    Err(e) => {
                        let message = DisplayErrorContext(&e).to_string();
                        warn!(error = %message, "Bedrock response stream failed");
                        yield Err(InvocationError::new(InvocationErrorKind::Stream, message));
                        break;
                    }
                }
            }
        };

        Ok(stream.boxed())
    }
}
