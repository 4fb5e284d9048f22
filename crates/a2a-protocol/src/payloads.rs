//! Common payload shapes.

use serde_json::{json, Value};

/// `{"type": "text", "content": ...}`
pub fn text(content: impl Into<String>) -> Value {
    json!({
        "type": "text",
        "content": content.into(),
    })
}

/// `{"type": "success", "result": ...}`
pub fn success(result: Value) -> Value {
    json!({
        "type": "success",
        "result": result,
    })
}

/// `{"type": "error", "code": ..., "message": ...}`
pub fn error(code: impl Into<String>, message: impl Into<String>) -> Value {
    json!({
        "type": "error",
        "code": code.into(),
        "message": message.into(),
    })
}

/// Whether `payload` is an error wrapper produced by [`error`].
pub fn is_error(payload: &Value) -> bool {
    payload.get("type").and_then(Value::as_str) == Some("error")
}
