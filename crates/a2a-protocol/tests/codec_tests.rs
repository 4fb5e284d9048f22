//! Tests for the JSON wire codec.
//!
//! Verifies:
//! - Full-field round trip through encode/decode
//! - Exact wire field names
//! - Absent / empty records
//! - Defaults applied to sparse records from other producers
//! - Structured errors for malformed records

use a2a_protocol::*;
use chrono::{Duration, Utc};
use serde_json::json;

const TOPIC: &str = "a2a.tasks";

fn roundtrip(envelope: &Envelope) -> Envelope {
    let bytes = codec::encode(TOPIC, Some(envelope)).unwrap();
    codec::decode(TOPIC, bytes.as_deref()).unwrap().expect("envelope")
}

// ═══════════════════════════════════════════════════════════════
// Round trip
// ═══════════════════════════════════════════════════════════════

#[test]
fn roundtrip_reproduces_every_field() {
    let original = EnvelopeBuilder::command("client", "translator", "translate", json!({
        "text": "bonjour",
        "nested": {"list": [1, 2.5, "three", null, true]},
    }))
    .timestamp(Utc::now() - Duration::milliseconds(1234))
    .header("tenant", "acme")
    .header("trace", "abc")
    .correlation_id("corr-9")
    .reply_to("client-inbox")
    .ttl_minutes(5)
    .task_id("parent-task")
    .build()
    .unwrap();

    let decoded = roundtrip(&original);

    assert_eq!(decoded.id, original.id);
    assert_eq!(decoded.message_type, original.message_type);
    assert_eq!(decoded.from, original.from);
    assert_eq!(decoded.to, original.to);
    assert_eq!(decoded.task_id, original.task_id);
    assert_eq!(decoded.method, original.method);
    assert_eq!(decoded.payload, original.payload);
    assert_eq!(decoded.timestamp, original.timestamp);
    assert_eq!(decoded.headers, original.headers);
    assert_eq!(decoded.correlation_id, original.correlation_id);
    assert_eq!(decoded.reply_to, original.reply_to);
    assert_eq!(decoded.ttl, original.ttl);
}

#[test]
fn roundtrip_preserves_absent_optionals_and_scalar_payload() {
    let original = EnvelopeBuilder::event("monitor", json!("status changed"))
        .build()
        .unwrap();
    let decoded = roundtrip(&original);
    assert!(decoded.to.is_none());
    assert!(decoded.headers.is_none());
    assert!(decoded.ttl.is_none());
    assert_eq!(decoded.payload, json!("status changed"));
}

// ═══════════════════════════════════════════════════════════════
// Wire format
// ═══════════════════════════════════════════════════════════════

#[test]
fn wire_field_names_are_exact() {
    let envelope = EnvelopeBuilder::reply("translator", "task-1", json!({}))
        .correlation_id("c")
        .reply_to("r")
        .ttl(10)
        .header("k", "v")
        .build()
        .unwrap();
    let bytes = codec::encode(TOPIC, Some(&envelope)).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "correlationId", "from", "headers", "id", "method", "payload", "replyTo",
            "taskId", "timestamp", "to", "ttl", "type",
        ]
    );
    assert_eq!(value["type"], "reply");
    assert_eq!(value["ttl"], 10);
}

#[test]
fn decodes_record_from_foreign_producer() {
    let raw = br#"{
        "id": "0f8c3c1e-1111-4222-8333-444455556666",
        "type": "command",
        "from": "ui",
        "to": "summarizer",
        "method": "summarize",
        "payload": {"text": "long text"},
        "timestamp": "2026-10-19T08:30:00.123Z",
        "correlationId": "web-1"
    }"#;
    let envelope = codec::decode(TOPIC, Some(raw)).unwrap().unwrap();
    assert!(envelope.is_command());
    assert_eq!(envelope.method.as_deref(), Some("summarize"));
    assert_eq!(envelope.timestamp.to_rfc3339(), "2026-10-19T08:30:00.123+00:00");
    assert!(envelope.task_id.is_none());
    assert!(envelope.headers.is_none());
}

#[test]
fn sparse_record_gets_generated_id_and_timestamp() {
    let before = Utc::now();
    let envelope = codec::decode(TOPIC, Some(br#"{"type":"event","from":"x","payload":1}"#))
        .unwrap()
        .unwrap();
    assert_eq!(envelope.id.len(), 36);
    assert!(envelope.timestamp >= before);
}

#[test]
fn null_timestamp_is_treated_as_missing() {
    let before = Utc::now();
    let envelope = codec::decode(
        TOPIC,
        Some(br#"{"id":"abc","type":"event","from":"x","payload":1,"timestamp":null}"#),
    )
    .unwrap()
    .unwrap();
    assert!(envelope.timestamp >= before);
    assert!(MessageValidator::default().validate(&envelope).is_valid());
}

#[test]
fn null_payload_and_from_decode_for_validator_to_report() {
    let envelope = codec::decode(TOPIC, Some(br#"{"id":"abc","type":"event","from":null}"#))
        .unwrap()
        .unwrap();
    assert!(envelope.payload.is_null());
    assert!(envelope.from.is_empty());
    let result = MessageValidator::default().validate(&envelope);
    assert_eq!(result.errors().len(), 2);
}

// ═══════════════════════════════════════════════════════════════
// Absent data and errors
// ═══════════════════════════════════════════════════════════════

#[test]
fn absent_or_empty_data_decodes_to_none() {
    assert!(codec::decode(TOPIC, None).unwrap().is_none());
    assert!(codec::decode(TOPIC, Some(b"")).unwrap().is_none());
}

#[test]
fn absent_envelope_encodes_to_none() {
    assert!(codec::encode(TOPIC, None).unwrap().is_none());
}

#[test]
fn malformed_bytes_fail_with_context() {
    let garbage = b"this is not json at all";
    let err = codec::decode(TOPIC, Some(garbage)).unwrap_err();
    match &err {
        CodecError::Deserialize { topic, length, .. } => {
            assert_eq!(topic, TOPIC);
            assert_eq!(*length, garbage.len());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains(TOPIC));
    assert!(message.contains("23 bytes"));
    assert!(!message.contains("not json at all"), "raw bytes must not leak into the error");
}

#[test]
fn unknown_message_type_fails_decoding() {
    let raw = br#"{"id":"abc","type":"notification","from":"x","payload":1,"timestamp":"2026-10-19T08:30:00Z"}"#;
    assert!(codec::decode(TOPIC, Some(raw)).is_err());
}

#[test]
fn uppercase_message_type_is_not_a_wire_value() {
    let raw = br#"{"id":"abc","type":"COMMAND","from":"x","payload":1,"timestamp":"2026-10-19T08:30:00Z"}"#;
    assert!(codec::decode(TOPIC, Some(raw)).is_err());
}
