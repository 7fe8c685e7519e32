//! Decoding of endpoint error arrays
//!
//! When a query cannot be satisfied the endpoint replies with
//! `{"errors": [{"message": "..."}]}` instead of data.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Extract readable messages from a failed response body.
///
/// Non-JSON bodies are returned verbatim, JSON without an `errors` array is
/// returned as compact JSON, and otherwise there is one message per entry.
pub fn decode_errors(body: &str) -> Vec<String> {
    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => return vec![body.to_string()],
    };

    let Some(entries) = json.get("errors").and_then(Value::as_array) else {
        return vec![json.to_string()];
    };
    if entries.is_empty() {
        return vec![json.to_string()];
    }

    entries
        .iter()
        .map(|entry| {
            ErrorEntry::deserialize(entry)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| entry.to_string())
        })
        .collect()
}
