//! Reduce a failed analysis call to a single user-facing message.

use pharmaguard_client::ServiceError;
use serde_json::Value;

use crate::error::RequestError;

pub const FALLBACK_MESSAGE: &str = "Analysis failed.";

/// Precedence: structured `detail` (list, then scalar), then connectivity
/// failures, then the error's own message.
pub fn normalize_failure(err: &ServiceError, backend_url: &str) -> RequestError {
    if let Some(detail) = err.detail().filter(|d| !is_blank(d)) {
        let message = match detail {
            Value::Array(items) => items.iter().map(detail_item_message).collect::<Vec<_>>().join(". "),
            other => scalar_message(other),
        };
        return RequestError::ServerValidation(message);
    }

    if err.is_network() {
        return RequestError::NetworkUnreachable(format!(
            "Cannot reach the backend. Ensure the server is running on {backend_url}"
        ));
    }

    RequestError::Unknown(message_or_fallback(err.to_string()))
}

fn message_or_fallback(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

fn is_blank(detail: &Value) -> bool {
    match detail {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// `msg`, then `message`, then the element's JSON text.
fn detail_item_message(item: &Value) -> String {
    ["msg", "message"]
        .iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| scalar_message(item))
}

fn scalar_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
