//! JSONP envelope decoder
//!
//! Some listing sources are JSONP-wrapped API endpoints: a JSON payload
//! wrapped in `callbackName( ... )`, sometimes with a trailing semicolon.
//! The same endpoints return bare JSON when no callback is requested, so
//! bare JSON is accepted too. Decode failure is pipeline-fatal: a mangled
//! envelope means no trustworthy listing at all.

use crate::JsonpError;
use serde_json::Value;

/// Decodes a JSONP (or bare JSON) payload into a JSON value
pub fn parse_jsonp(raw: &str) -> Result<Value, JsonpError> {
    let trimmed = raw.trim();

    // Bare JSON first: endpoints drop the wrapper when no callback is named.
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let open = trimmed.find('(').ok_or(JsonpError::MissingWrapper)?;
    let close = trimmed.rfind(')').ok_or(JsonpError::MissingWrapper)?;
    if close <= open {
        return Err(JsonpError::MissingWrapper);
    }

    let inner = &trimmed[open + 1..close];
    Ok(serde_json::from_str(inner)?)
}

/// Decodes a JSONP payload and returns its `items` sequence
///
/// The mapping must contain an `items` array; anything else is a fatal
/// decode error (no partial listing).
pub fn jsonp_items(raw: &str) -> Result<Vec<Value>, JsonpError> {
    let value = parse_jsonp(raw)?;
    match value.get("items") {
        Some(Value::Array(items)) => Ok(items.clone()),
        _ => Err(JsonpError::MissingItems),
    }
}
