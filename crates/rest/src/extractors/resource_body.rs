//! Resource body decoding.
//!
//! Handlers take the raw body as [`Bytes`] and decode it only after the path
//! has been validated, so an unknown resource type or a malformed id is
//! reported ahead of a malformed body. The content type header is not
//! consulted. Failures are answered according to the configured status code
//! policy: 500 by default, 400 with strict status codes.

use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::error::{RestError, RestResult};

/// A decoded resource body.
///
/// # Example
///
/// ```rust
/// use axum::body::Bytes;
/// use carebase_rest::extractors::ResourceBody;
///
/// let body = ResourceBody::from_bytes(&Bytes::from_static(b"{\"gender\":\"female\"}"), false).unwrap();
/// assert_eq!(body.0["gender"], "female");
/// ```
#[derive(Debug)]
pub struct ResourceBody(pub Map<String, Value>);

impl ResourceBody {
    /// Decodes a request body, honouring strict status codes.
    pub fn from_bytes(bytes: &Bytes, strict: bool) -> RestResult<Self> {
        decode_object(bytes)
            .map(ResourceBody)
            .map_err(|message| RestError::decode(message, strict))
    }

    /// Returns the id carried in the body, if any.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(|v| v.as_str())
    }

    /// Consumes the body and returns the inner object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Decodes bytes into a JSON object.
pub fn decode_object(bytes: &[u8]) -> Result<Map<String, Value>, String> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!(
            "json: cannot unmarshal {} into resource object",
            json_kind(&other)
        )),
        Err(e) => Err(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_object() {
        let map = decode_object(br#"{"resourceType":"RelatedPerson","gender":"male"}"#).unwrap();
        assert_eq!(map["gender"], "male");
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        let err = decode_object(b"[1,2]").unwrap_err();
        assert!(err.contains("array"));
        assert!(decode_object(b"\"text\"").is_err());
        assert!(decode_object(b"null").is_err());
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(decode_object(b"").is_err());
        assert!(decode_object(b"{\"status\":").is_err());
    }

    #[test]
    fn test_from_bytes_policy() {
        let bad = Bytes::from_static(b"not json");
        assert!(matches!(
            ResourceBody::from_bytes(&bad, false),
            Err(RestError::DecodeFailure { .. })
        ));
        assert!(matches!(
            ResourceBody::from_bytes(&bad, true),
            Err(RestError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_body_id() {
        let body = ResourceBody(decode_object(br#"{"id":"differentid"}"#).unwrap());
        assert_eq!(body.id(), Some("differentid"));
    }
}
