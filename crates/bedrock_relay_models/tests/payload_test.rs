//! Tests for payload encoding and chunk decoding.

use bedrock_relay_core::ResponseChunk;
use bedrock_relay_models::{PayloadFormat, RequestVariant, Translator, encode_invocation};
use serde_json::{Value, json};

#[test]
fn test_legacy_payload_shape() {
    let request = Translator::default()
        .translate(RequestVariant::Legacy, br#"{"topic": "how to learn japanese?"}"#)
        .expect("valid request");

    let invocation = encode_invocation(&request).expect("encodable");
    let payload: Value = serde_json::from_slice(invocation.body()).expect("JSON body");

    assert_eq!(invocation.model_id(), "anthropic.claude-v2");
    assert_eq!(invocation.content_type(), "application/json");
    assert_eq!(
        payload,
        json!({
            "prompt": "\n\nHuman: how to learn japanese?\n\nAssistant:",
            "max_tokens_to_sample": 2048
        })
    );
}

#[test]
fn test_messages_payload_shape() {
    let body = json!({
        "messages": [{"role": "user", "content": [{"type": "text", "text": "How to cook chicken soup?"}]}]
    });
    let request = Translator::default()
        .translate(RequestVariant::Chat, body.to_string().as_bytes())
        .expect("valid request");

    let invocation = encode_invocation(&request).expect("encodable");
    let payload: Value = serde_json::from_slice(invocation.body()).expect("JSON body");

    assert_eq!(invocation.model_id(), "anthropic.claude-3-haiku-20240307-v1:0");
    assert_eq!(invocation.accept(), "application/json");
    assert_eq!(payload["max_tokens"], json!(2048));
    assert_eq!(payload["anthropic_version"], json!("bedrock-2023-05-31"));
    assert_eq!(payload["messages"], body["messages"]);
    assert!((payload["temperature"].as_f64().expect("temperature") - 0.9).abs() < 1e-6);
}

#[test]
fn test_payload_format_follows_request_input() {
    let translator = Translator::default();
    let legacy = translator
        .translate(RequestVariant::Legacy, br#"{"topic": "t"}"#)
        .expect("valid request");
    let chat = translator
        .translate(
            RequestVariant::Chat,
            br#"{"messages": [{"role": "user", "content": [{"type": "text", "text": "t"}]}]}"#,
        )
        .expect("valid request");

    assert_eq!(PayloadFormat::of(&legacy), PayloadFormat::TextCompletion);
    assert_eq!(PayloadFormat::of(&chat), PayloadFormat::Messages);
}

#[test]
fn test_decode_completion_chunk() {
    let chunk = PayloadFormat::TextCompletion
        .decode_chunk(br#"{"completion": " Hello", "stop_reason": null}"#)
        .expect("valid chunk");
    assert_eq!(chunk, ResponseChunk::TextDelta(" Hello".into()));
}

#[test]
fn test_decode_text_delta_event() {
    let chunk = PayloadFormat::Messages
        .decode_chunk(
            br#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":" is"}}"#,
        )
        .expect("valid chunk");
    assert_eq!(chunk, ResponseChunk::TextDelta(" is".into()));
}

#[test]
fn test_decode_non_text_events_as_unknown() {
    let events = [
        (
            r#"{"type":"message_start","message":{"id":"msg_1","role":"assistant"}}"#,
            "message_start",
        ),
        (
            r#"{"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#,
            "content_block_start",
        ),
        (
            r#"{"type":"message_delta","delta":{"stop_reason":"end_turn"}}"#,
            "message_delta",
        ),
        (r#"{"type":"message_stop"}"#, "message_stop"),
    ];

    for (payload, tag) in events {
        let chunk = PayloadFormat::Messages
            .decode_chunk(payload.as_bytes())
            .expect("valid event");
        assert_eq!(chunk, ResponseChunk::Unknown(tag.to_string()));
    }
}

#[test]
fn test_decode_malformed_chunk_fails() {
    assert!(PayloadFormat::Messages.decode_chunk(b"{\"type\":").is_err());
    assert!(PayloadFormat::TextCompletion.decode_chunk(b"garbage").is_err());
}

#[test]
fn test_image_payload_forwards_parts_verbatim() {
    let body = json!({
        "messages": [{"role": "user", "content": [
            {
                "type": "image",
                "source": {"type": "base64", "media_type": "image/jpeg", "data": "aGVsbG8="},
                "cache_control": {"type": "ephemeral"}
            },
            {"type": "text", "text": "hi", "cache_control": {"type": "ephemeral"}}
        ]}]
    });
    let request = Translator::default()
        .translate(RequestVariant::Image, body.to_string().as_bytes())
        .expect("valid request");

    let invocation = encode_invocation(&request).expect("encodable");
    let payload: Value = serde_json::from_slice(invocation.body()).expect("JSON body");

    assert_eq!(payload["messages"], body["messages"]);
}
