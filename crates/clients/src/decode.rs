//! Turns an agent runtime response body into display text.
//!
//! The runtime answers either with a server-sent event stream, with a JSON
//! document, or with an arbitrary body. Each gets flattened to a string.

use serde_json::Value;

pub const EVENT_STREAM: &str = "text/event-stream";
pub const APPLICATION_JSON: &str = "application/json";

const DATA_PREFIX: &str = "data: ";

pub fn decode_agent_payload(content_type: &str, body: &[u8]) -> String {
    if content_type.contains(EVENT_STREAM) {
        decode_event_stream(body)
    } else if content_type == APPLICATION_JSON {
        decode_json(body)
    } else {
        String::from_utf8_lossy(body).into_owned()
    }
}

/// Concatenates the payload of every `data: ` line, ignoring other fields.
pub fn decode_event_stream(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.strip_prefix(DATA_PREFIX))
        .collect()
}

/// `{"output": "..."}` yields the output text; other JSON is re-serialized compactly.
pub fn decode_json(body: &[u8]) -> String {
    let raw = String::from_utf8_lossy(body);
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(mut map)) => match map.remove("output") {
            Some(Value::String(output)) => output,
            Some(other) => {
                map.insert("output".to_string(), other);
                Value::Object(map).to_string()
            }
            None => Value::Object(map).to_string(),
        },
        Ok(value) => value.to_string(),
        Err(_) => raw.into_owned(),
    }
}
