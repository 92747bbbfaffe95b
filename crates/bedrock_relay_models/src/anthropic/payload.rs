//! Outbound payload schemas.

use bedrock_relay_core::{ChatMessage, GenerationInput, GenerationRequest};
use bedrock_relay_error::{InvocationError, InvocationErrorKind};
use bedrock_relay_interface::ModelInvocation;
use serde::Serialize;
use tracing::{debug, instrument};

/// Messages API version sent when the request does not name one.
pub const DEFAULT_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Text-completion payload for legacy Claude models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyPayload<'a> {
    /// Human/Assistant formatted prompt
    pub prompt: &'a str,
    /// Output token budget
    pub max_tokens_to_sample: u32,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Messages API payload for Claude 3 models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagesPayload<'a> {
    /// Output token budget
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// API version tag required by Bedrock
    pub anthropic_version: &'a str,
    /// Conversation history, passed through unchanged
    pub messages: &'a [ChatMessage],
}

/// Serializes a generation request into an upstream invocation.
///
/// # Errors
///
/// Returns an [`InvocationError`] of kind `Setup` if the payload cannot be
/// serialized.
#[instrument(skip(request), fields(model = %request.model()))]
pub fn encode_invocation(request: &GenerationRequest) -> Result<ModelInvocation, InvocationError> {
    let body = match request.input() {
        GenerationInput::Prompt(prompt) => serde_json::to_vec(&LegacyPayload {
            prompt,
            max_tokens_to_sample: *request.max_tokens(),
            temperature: *request.temperature(),
        }),
        GenerationInput::Messages(messages) => serde_json::to_vec(&MessagesPayload {
            max_tokens: *request.max_tokens(),
            temperature: *request.temperature(),
            anthropic_version: request
                .anthropic_version()
                .as_deref()
                .unwrap_or(DEFAULT_ANTHROPIC_VERSION),
            messages,
        }),
    }
    .map_err(|e| {
        InvocationError::new(
            InvocationErrorKind::Setup,
            format!("Failed to serialize payload: {}", e),
        )
    })?;

    debug!(bytes = body.len(), "Encoded upstream payload");

    ModelInvocation::builder()
        .model_id(request.model().clone())
        .body(body)
        .build()
        .map_err(|e| InvocationError::new(InvocationErrorKind::Setup, e.to_string()))
}
