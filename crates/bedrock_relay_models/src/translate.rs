//! Client request translation.

use crate::RequestVariant;
use crate::anthropic::DEFAULT_ANTHROPIC_VERSION;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bedrock_relay_core::{ChatMessage, ContentPart, GenerationInput, GenerationRequest, ImageSource};
use bedrock_relay_error::{ConfigError, DecodeError, RelayResult};
use derive_getters::Getters;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Prompt template for the legacy single-turn variant; `{}` is the topic.
pub const LEGACY_PROMPT_TEMPLATE: &str = "\n\nHuman: {}\n\nAssistant:";

/// Wraps a topic in the legacy Human/Assistant prompt.
///
/// # Examples
///
/// ```
/// use bedrock_relay_models::legacy_prompt;
///
/// assert_eq!(legacy_prompt("X"), "\n\nHuman: X\n\nAssistant:");
/// ```
pub fn legacy_prompt(topic: &str) -> String {
    LEGACY_PROMPT_TEMPLATE.replacen("{}", topic, 1)
}

/// Model selection and fixed generation parameters per variant.
///
/// Deserializes from the `[models]` table of the server configuration; absent
/// keys take their defaults.
#[derive(Debug, Clone, PartialEq, Getters, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
#[serde(default)]
pub struct TranslatorConfig {
    /// Model for the legacy variant
    #[builder(default = "\"anthropic.claude-v2\".to_string()")]
    legacy_model: String,
    /// Model for the chat variant
    #[builder(default = "\"anthropic.claude-3-haiku-20240307-v1:0\".to_string()")]
    chat_model: String,
    /// Model for the image variant
    #[builder(default = "\"anthropic.claude-3-haiku-20240307-v1:0\".to_string()")]
    image_model: String,
    /// Output token budget for every variant
    #[builder(default = "2048")]
    max_tokens: u32,
    /// Temperature for the chat and image variants
    #[builder(default = "0.9")]
    chat_temperature: f32,
    /// Messages API version tag
    #[builder(default = "DEFAULT_ANTHROPIC_VERSION.to_string()")]
    anthropic_version: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            legacy_model: "anthropic.claude-v2".to_string(),
            chat_model: "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
            image_model: "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
            max_tokens: 2048,
            chat_temperature: 0.9,
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
        }
    }
}

impl TranslatorConfig {
    /// Returns a builder for constructing a TranslatorConfig.
    pub fn builder() -> TranslatorConfigBuilder {
        TranslatorConfigBuilder::default()
    }

    /// Model identifier used for a variant.
    pub fn model_for(&self, variant: RequestVariant) -> &str {
        match variant {
            RequestVariant::Legacy => &self.legacy_model,
            RequestVariant::Chat => &self.chat_model,
            RequestVariant::Image => &self.image_model,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopicBody {
    topic: String,
}

#[derive(Debug, Deserialize)]
struct MessagesBody {
    messages: Vec<ChatMessage>,
}

/// Builds upstream generation requests from client request bodies.
///
/// Performs no I/O.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslatorConfig,
}

impl Translator {
    /// Creates a translator with the given parameters.
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    /// The active parameters.
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Decodes a raw request body and builds the generation request.
    ///
    /// # Errors
    ///
    /// A [`DecodeError`] when the body does not match the variant's shape or
    /// breaks a content invariant; a [`ConfigError`] when the configured
    /// generation parameters are invalid.
    #[instrument(skip(self, body), fields(variant = %variant, body_len = body.len()))]
    pub fn translate(&self, variant: RequestVariant, body: &[u8]) -> RelayResult<GenerationRequest> {
        let (input, temperature, anthropic_version) = match variant {
            RequestVariant::Legacy => {
                let body: TopicBody = serde_json::from_slice(body)
                    .map_err(|e| DecodeError::new(format!("Invalid topic request: {}", e)))?;
                if body.topic.trim().is_empty() {
                    return Err(DecodeError::new("topic is empty").into());
                }
                (GenerationInput::Prompt(legacy_prompt(&body.topic)), None, None)
            }
            RequestVariant::Chat | RequestVariant::Image => {
                let body: MessagesBody = serde_json::from_slice(body)
                    .map_err(|e| DecodeError::new(format!("Invalid messages request: {}", e)))?;
                validate_messages(variant, &body.messages)?;
                (
                    GenerationInput::Messages(body.messages),
                    Some(self.config.chat_temperature),
                    Some(self.config.anthropic_version.clone()),
                )
            }
        };

        let request = GenerationRequest::builder()
            .model(self.config.model_for(variant))
            .max_tokens(self.config.max_tokens)
            .temperature(temperature)
            .anthropic_version(anthropic_version)
            .input(input)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid generation parameters: {}", e)))?;

        debug!(
            model = %request.model(),
            messages = request.messages().map_or(0, <[ChatMessage]>::len),
            "Translated client request"
        );
        Ok(request)
    }
}

fn validate_messages(variant: RequestVariant, messages: &[ChatMessage]) -> Result<(), DecodeError> {
    if messages.is_empty() {
        return Err(DecodeError::new("messages list is empty"));
    }
    for (index, message) in messages.iter().enumerate() {
        message
            .validate()
            .map_err(|e| DecodeError::new(format!("message {}: {}", index, e.message)))?;
        for part in message.content() {
            match (variant, part) {
                (_, ContentPart::Text { .. }) => {}
                (RequestVariant::Image, ContentPart::Image { source, .. }) => {
                    validate_image(source)
                        .map_err(|e| DecodeError::new(format!("message {}: {}", index, e)))?;
                }
                (RequestVariant::Image, ContentPart::Passthrough(_)) => {}
                (_, other) => {
                    return Err(DecodeError::new(format!(
                        "message {}: {} content is not accepted by the {} endpoint",
                        index,
                        other.kind(),
                        variant
                    )));
                }
            }
        }
    }
    Ok(())
}

fn validate_image(source: &ImageSource) -> Result<(), String> {
    match source {
        ImageSource::Base64 { media_type, data } => {
            if !media_type.starts_with("image/") {
                return Err(format!("unsupported image media type `{}`", media_type));
            }
            STANDARD
                .decode(data)
                .map_err(|e| format!("image data is not valid base64: {}", e))?;
            Ok(())
        }
        ImageSource::Url { url } if url.is_empty() => Err("image url is empty".to_string()),
        ImageSource::Url { .. } => Ok(()),
    }
}
