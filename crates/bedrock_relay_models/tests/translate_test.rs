//! Tests for client request translation.

use bedrock_relay_core::{ChatMessage, ContentPart, GenerationInput, Role};
use bedrock_relay_error::RelayErrorKind;
use bedrock_relay_models::{RequestVariant, Translator, TranslatorConfig};
use serde_json::json;

fn translator() -> Translator {
    Translator::new(TranslatorConfig::default())
}

#[test]
fn test_legacy_topic_is_wrapped_in_prompt_template() {
    let request = translator()
        .translate(RequestVariant::Legacy, br#"{"topic": "X"}"#)
        .expect("valid legacy request");

    let prompt = request.prompt().expect("legacy requests carry a prompt");
    assert!(prompt.contains("\n\nHuman: X\n\nAssistant:"));
    assert_eq!(*request.max_tokens(), 2048);
    assert_eq!(*request.temperature(), None);
    assert_eq!(request.model(), "anthropic.claude-v2");
}

#[test]
fn test_chat_request_keeps_messages_unchanged() {
    let body = json!({
        "messages": [{"role": "user", "content": [{"type": "text", "text": "hi"}]}]
    });

    let request = translator()
        .translate(RequestVariant::Chat, body.to_string().as_bytes())
        .expect("valid chat request");

    assert_eq!(*request.temperature(), Some(0.9));
    assert_eq!(*request.max_tokens(), 2048);
    assert_eq!(
        request.input(),
        &GenerationInput::Messages(vec![ChatMessage::new(
            Role::User,
            vec![ContentPart::text("hi")]
        )])
    );
    assert_eq!(
        request.anthropic_version().as_deref(),
        Some("bedrock-2023-05-31")
    );
}

#[test]
fn test_chat_request_preserves_multi_turn_order() {
    let body = json!({
        "messages": [
            {"role": "user", "content": [{"type": "text", "text": "How to cook chicken soup?"}]},
            {"role": "assistant", "content": [{"type": "text", "text": "Here is a basic recipe for cooking chicken soup"}]},
            {"role": "user", "content": [{"type": "text", "text": "How to customize it for 3 years old girl?"}]}
        ]
    });

    let request = translator()
        .translate(RequestVariant::Chat, body.to_string().as_bytes())
        .expect("valid chat request");

    let roles: Vec<Role> = request
        .messages()
        .expect("messages request")
        .iter()
        .map(|m| *m.role())
        .collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
}

#[test]
fn test_malformed_body_is_a_decode_error() {
    for variant in [RequestVariant::Legacy, RequestVariant::Chat, RequestVariant::Image] {
        let err = translator()
            .translate(variant, b"{not json")
            .expect_err("malformed JSON must fail");
        assert!(
            matches!(err.kind(), RelayErrorKind::Decode(_)),
            "{} should fail with a decode error, got {}",
            variant,
            err
        );
    }
}

#[test]
fn test_wrong_shape_is_a_decode_error() {
    let err = translator()
        .translate(RequestVariant::Legacy, br#"{"messages": []}"#)
        .expect_err("missing topic must fail");
    assert!(matches!(err.kind(), RelayErrorKind::Decode(_)));
}

#[test]
fn test_empty_topic_is_rejected() {
    let err = translator()
        .translate(RequestVariant::Legacy, br#"{"topic": "  "}"#)
        .expect_err("blank topic must fail");
    assert!(matches!(err.kind(), RelayErrorKind::Decode(_)));
}

#[test]
fn test_empty_message_list_is_rejected() {
    let err = translator()
        .translate(RequestVariant::Chat, br#"{"messages": []}"#)
        .expect_err("empty messages must fail");
    assert!(matches!(err.kind(), RelayErrorKind::Decode(_)));
}

#[test]
fn test_message_with_empty_content_is_rejected() {
    let err = translator()
        .translate(
            RequestVariant::Chat,
            br#"{"messages": [{"role": "user", "content": []}]}"#,
        )
        .expect_err("empty content must fail");
    assert!(err.to_string().contains("message 0"));
}

#[test]
fn test_chat_endpoint_rejects_image_parts() {
    let body = json!({
        "messages": [{"role": "user", "content": [
            {"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "aGVsbG8="}}
        ]}]
    });

    let err = translator()
        .translate(RequestVariant::Chat, body.to_string().as_bytes())
        .expect_err("chat variant is text only");
    assert!(err.to_string().contains("image content"));
}

#[test]
fn test_image_endpoint_accepts_images_and_passthrough_parts() {
    let body = json!({
        "messages": [{"role": "user", "content": [
            {"type": "image", "source": {"type": "base64", "media_type": "image/jpeg", "data": "aGVsbG8="}},
            {"type": "document", "source": {"type": "text", "data": "notes"}},
            {"type": "text", "text": "What is in this picture?"}
        ]}]
    });

    let request = translator()
        .translate(RequestVariant::Image, body.to_string().as_bytes())
        .expect("valid image request");

    let message = &request.messages().expect("messages request")[0];
    assert_eq!(message.content().len(), 3);
    assert_eq!(message.content()[1].kind(), "document");
    assert_eq!(*request.temperature(), Some(0.9));
}

#[test]
fn test_image_endpoint_rejects_invalid_base64() {
    let body = json!({
        "messages": [{"role": "user", "content": [
            {"type": "image", "source": {"type": "base64", "media_type": "image/jpeg", "data": "%%%"}}
        ]}]
    });

    let err = translator()
        .translate(RequestVariant::Image, body.to_string().as_bytes())
        .expect_err("invalid base64 must fail");
    assert!(matches!(err.kind(), RelayErrorKind::Decode(_)));
}

#[test]
fn test_configured_parameters_are_used() {
    let config = TranslatorConfig::builder()
        .chat_model("anthropic.claude-3-sonnet-20240229-v1:0")
        .max_tokens(512u32)
        .chat_temperature(0.2f32)
        .build()
        .expect("valid config");

    let request = Translator::new(config)
        .translate(
            RequestVariant::Chat,
            br#"{"messages": [{"role": "user", "content": [{"type": "text", "text": "hi"}]}]}"#,
        )
        .expect("valid chat request");

    assert_eq!(request.model(), "anthropic.claude-3-sonnet-20240229-v1:0");
    assert_eq!(*request.max_tokens(), 512);
    assert_eq!(*request.temperature(), Some(0.2));
}

#[test]
fn test_invalid_configured_temperature_is_a_config_error() {
    let config = TranslatorConfig::builder()
        .chat_temperature(3.0f32)
        .build()
        .expect("builder does not validate");

    let err = Translator::new(config)
        .translate(
            RequestVariant::Chat,
            br#"{"messages": [{"role": "user", "content": [{"type": "text", "text": "hi"}]}]}"#,
        )
        .expect_err("temperature out of range");
    assert!(matches!(err.kind(), RelayErrorKind::Config(_)));
}
