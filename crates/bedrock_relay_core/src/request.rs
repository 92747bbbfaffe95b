//! Generation request types.

use crate::ChatMessage;
use serde::{Deserialize, Serialize};

/// What the model is asked to continue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationInput {
    /// A single pre-formatted completion prompt (legacy text-completion models).
    Prompt(String),
    /// A multi-turn message history (messages API models).
    Messages(Vec<ChatMessage>),
}

/// A single upstream generation call, built fresh per HTTP request.
///
/// # Examples
///
/// ```
/// use bedrock_relay_core::{ChatMessage, GenerationInput, GenerationRequest};
///
/// let request = GenerationRequest::builder()
///     .model("anthropic.claude-3-haiku-20240307-v1:0")
///     .max_tokens(2048u32)
///     .temperature(Some(0.9f32))
///     .input(GenerationInput::Messages(vec![ChatMessage::user_text("hi")]))
///     .build()
///     .expect("valid request");
///
/// assert_eq!(*request.max_tokens(), 2048);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct GenerationRequest {
    /// Opaque upstream model identifier
    model: String,
    /// Maximum output tokens
    max_tokens: u32,
    /// Sampling temperature in `[0, 1]`
    #[builder(default)]
    temperature: Option<f32>,
    /// Messages API version tag, when the model requires one
    #[builder(default)]
    anthropic_version: Option<String>,
    /// Prompt or message history
    input: GenerationInput,
}

impl GenerationRequest {
    /// Returns a builder for constructing a GenerationRequest.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// Message history, if this is a messages request.
    pub fn messages(&self) -> Option<&[ChatMessage]> {
        match &self.input {
            GenerationInput::Messages(messages) => Some(messages),
            GenerationInput::Prompt(_) => None,
        }
    }

    /// Completion prompt, if this is a legacy request.
    pub fn prompt(&self) -> Option<&str> {
        match &self.input {
            GenerationInput::Prompt(prompt) => Some(prompt),
            GenerationInput::Messages(_) => None,
        }
    }
}

impl GenerationRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.max_tokens {
            return Err("max_tokens must be positive".to_string());
        }
        if let Some(Some(temperature)) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err(format!("temperature {temperature} is outside [0, 1]"));
            }
        }
        if self.model.as_deref().is_some_and(str::is_empty) {
            return Err("model identifier is empty".to_string());
        }
        Ok(())
    }
}
