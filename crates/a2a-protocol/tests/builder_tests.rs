//! Tests for envelope construction.
//!
//! Verifies:
//! - Command / reply / event constructors set their routing fields
//! - Fail-fast construction errors name the missing field
//! - Defaults (id, timestamp) and optional fields
//! - Built envelopes are independent of later builder use

use a2a_protocol::*;
use chrono::{Duration, Utc};
use serde_json::json;

// ═══════════════════════════════════════════════════════════════
// Successful construction
// ═══════════════════════════════════════════════════════════════

#[test]
fn command_build_sets_type_target_and_method() {
    let cases = [
        ("client", "translator", "translate", json!({"text": "hola"})),
        ("a.b_c-1", "summarizer", "summarize", json!("plain text")),
        ("ui", "llm", "respond", json!([1, 2, 3])),
        ("ui", "llm", "ping", json!(0)),
    ];
    for (from, to, method, payload) in cases {
        let envelope = EnvelopeBuilder::command(from, to, method, payload.clone())
            .build()
            .expect("valid command must build");
        assert_eq!(envelope.message_type, MessageType::Command);
        assert_eq!(envelope.from, from);
        assert_eq!(envelope.to.as_deref(), Some(to));
        assert_eq!(envelope.method.as_deref(), Some(method));
        assert_eq!(envelope.payload, payload);
    }
}

#[test]
fn reply_build_sets_task_id() {
    let envelope = EnvelopeBuilder::reply("translator", "task-123", payloads::text("done"))
        .build()
        .unwrap();
    assert!(envelope.is_reply());
    assert_eq!(envelope.task_id.as_deref(), Some("task-123"));
    assert!(envelope.has_task_id());
}

#[test]
fn event_build_has_no_extra_requirements() {
    let envelope = EnvelopeBuilder::event("monitor", json!({"status": "UP"}))
        .build()
        .unwrap();
    assert!(envelope.is_event());
    assert!(envelope.to.is_none());
    assert!(envelope.method.is_none());
    assert!(envelope.task_id.is_none());
}

#[test]
fn build_generates_uuid_id_and_current_timestamp() {
    let before = Utc::now();
    let envelope = EnvelopeBuilder::event("a", json!(1)).build().unwrap();
    let after = Utc::now();
    assert_eq!(envelope.id.len(), 36, "default id should be a UUID-v4 string");
    assert!(envelope.timestamp >= before && envelope.timestamp <= after);
}

#[test]
fn build_keeps_explicit_optional_fields() {
    let ts = Utc::now() - Duration::seconds(5);
    let envelope = EnvelopeBuilder::create()
        .message_type(MessageType::Command)
        .id("msg-42")
        .from("client")
        .to("translator")
        .method("translate")
        .payload(json!({"text": "x"}))
        .timestamp(ts)
        .header("tenant", "acme")
        .correlation_id("corr-1")
        .reply_to("client-inbox")
        .ttl(2500)
        .build()
        .unwrap();
    assert_eq!(envelope.id, "msg-42");
    assert_eq!(envelope.timestamp, ts);
    assert_eq!(envelope.header("tenant"), Some("acme"));
    assert_eq!(envelope.correlation_id.as_deref(), Some("corr-1"));
    assert_eq!(envelope.reply_to.as_deref(), Some("client-inbox"));
    assert_eq!(envelope.ttl, Some(2500));
}

#[test]
fn distinct_builds_get_distinct_ids() {
    let a = EnvelopeBuilder::event("a", json!(1)).build().unwrap();
    let b = EnvelopeBuilder::event("a", json!(1)).build().unwrap();
    assert_ne!(a, b);
}

#[test]
fn built_envelope_is_independent_of_builder_clone() {
    let builder = EnvelopeBuilder::event("a", json!({"v": 1})).header("h", "1");
    let first = builder.clone().build().unwrap();
    let second = builder.header("h", "2").payload(json!({"v": 2})).build().unwrap();
    assert_eq!(first.header("h"), Some("1"));
    assert_eq!(first.payload, json!({"v": 1}));
    assert_eq!(second.header("h"), Some("2"));
}

// ═══════════════════════════════════════════════════════════════
// Construction failures
// ═══════════════════════════════════════════════════════════════

#[test]
fn command_with_blank_to_fails() {
    let err = EnvelopeBuilder::command("client", "", "translate", json!({}))
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::MissingTo);
    assert_eq!(err.field(), "to");
}

#[test]
fn command_with_whitespace_method_fails() {
    let err = EnvelopeBuilder::command("client", "translator", "  ", json!({}))
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::MissingMethod);
}

#[test]
fn reply_with_blank_task_id_fails() {
    let err = EnvelopeBuilder::reply("translator", "", json!({}))
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::MissingTaskId);
    assert_eq!(err.to_string(), "Task ID is required for reply messages");
}

#[test]
fn blank_from_fails_for_every_type() {
    let builders = [
        EnvelopeBuilder::command(" ", "b", "m", json!(1)),
        EnvelopeBuilder::reply("", "task-1", json!(1)),
        EnvelopeBuilder::event("", json!(1)),
    ];
    for builder in builders {
        assert_eq!(builder.build().unwrap_err(), BuildError::MissingFrom);
    }
}

#[test]
fn null_payload_fails_for_every_type() {
    let builders = [
        EnvelopeBuilder::command("a", "b", "m", serde_json::Value::Null),
        EnvelopeBuilder::reply("a", "task-1", serde_json::Value::Null),
        EnvelopeBuilder::event("a", serde_json::Value::Null),
    ];
    for builder in builders {
        assert_eq!(builder.build().unwrap_err(), BuildError::MissingPayload);
    }
}

#[test]
fn missing_from_reported_before_missing_payload() {
    let err = EnvelopeBuilder::create()
        .message_type(MessageType::Event)
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::MissingFrom);
}

// ═══════════════════════════════════════════════════════════════
// Expiry
// ═══════════════════════════════════════════════════════════════

#[test]
fn ttl_expiry_is_evaluated_lazily() {
    let now = Utc::now();
    let envelope = EnvelopeBuilder::event("a", json!(1))
        .timestamp(now)
        .ttl(1000)
        .build()
        .unwrap();
    assert!(!envelope.is_expired_at(now + Duration::milliseconds(500)));
    assert!(envelope.is_expired_at(now + Duration::milliseconds(1500)));
}

#[test]
fn ttl_seconds_expiry() {
    let now = Utc::now();
    let envelope = EnvelopeBuilder::event("a", json!(1))
        .timestamp(now)
        .ttl_seconds(2)
        .build()
        .unwrap();
    assert_eq!(envelope.expires_at(), Some(now + Duration::seconds(2)));
    assert!(!envelope.is_expired_at(now + Duration::seconds(1)));
    assert!(envelope.is_expired_at(now + Duration::seconds(3)));
}
