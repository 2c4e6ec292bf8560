//! Conversion of decoded values to JSON.
//!
//! Dates become ISO-8601 text, binary blobs become standard base64, and
//! unknown entries become a placeholder string naming their tag.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Number};

use super::types::models::Value;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Converts a decoded tree to a `serde_json` value, keeping mapping order.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Float32(f) => float(f64::from(*f)),
        Value::Float64(f) => float(*f),
        Value::DateTime(dt) => serde_json::Value::String(dt.format(DATETIME_FORMAT).to_string()),
        Value::Text(s) | Value::WideText(s) | Value::PlatformText(s) => {
            serde_json::Value::String(s.clone())
        }
        Value::Binary(bytes) => serde_json::Value::String(STANDARD.encode(bytes)),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Mapping(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect::<Map<_, _>>(),
        ),
        Value::Unknown { tag, raw } => {
            serde_json::Value::String(format!("{:#x} - Unknown Type: {:#x}", raw, tag))
        }
    }
}

// JSON has no NaN or infinity.
fn float(f: f64) -> serde_json::Value {
    Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Serializes a decoded tree as JSON text.
pub fn to_json_string(value: &Value, pretty: bool) -> serde_json::Result<String> {
    let json = to_json(value);
    if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    }
}
