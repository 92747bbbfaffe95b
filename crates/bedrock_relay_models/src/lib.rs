//! Request translation and upstream integration for bedrock-relay.
//!
//! - [`Translator`] turns a client request body into a [`GenerationRequest`](bedrock_relay_core::GenerationRequest)
//! - [`anthropic`] holds the Anthropic-on-Bedrock payload schemas and chunk decoders
//! - [`BedrockBackend`] streams invocations through the AWS SDK

pub mod anthropic;
mod bedrock;
mod translate;
mod variant;

pub use anthropic::{PayloadFormat, encode_invocation};
pub use bedrock::BedrockBackend;
pub use translate::{LEGACY_PROMPT_TEMPLATE, Translator, TranslatorConfig, TranslatorConfigBuilder, legacy_prompt};
pub use variant::RequestVariant;
