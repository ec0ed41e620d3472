//! The flattened response shape every API call resolves to.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ClientError;

/// Status text reported for requests that never produced an HTTP response.
pub const NETWORK_ERROR: &str = "Network Error";

/// Transport metadata flattened together with the parsed JSON payload.
///
/// Serializes as a single object, e.g.
/// `{"success":true,"status":200,"statusText":"OK","results":[...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    pub success: bool,
    /// HTTP status code, or `0` when the request never reached the server.
    pub status: u16,
    pub status_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl NormalizedResponse {
    /// Response for a request that failed below HTTP (DNS, connect, TLS, timeout).
    #[must_use]
    pub fn network_error(message: &str) -> Self {
        Self {
            success: false,
            status: 0,
            status_text: NETWORK_ERROR.to_string(),
            error: Some(message.to_string()),
            payload: Map::new(),
        }
    }

    /// Builds a response from an HTTP status and raw body text.
    ///
    /// - empty body: empty payload, success follows the status
    /// - JSON object: becomes the payload; an `error` field forces failure
    /// - other JSON: exposed under `data`
    /// - not JSON: failure with the real status
    #[must_use]
    pub fn from_parts(status: u16, status_text: &str, is_success: bool, body: &str) -> Self {
        let mut response = Self {
            success: is_success,
            status,
            status_text: status_text.to_string(),
            error: None,
            payload: Map::new(),
        };

        if body.trim().is_empty() {
            return response;
        }

        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut map)) => {
                if let Some(err) = map.remove("error").filter(|v| !v.is_null()) {
                    response.success = false;
                    response.error = Some(match err {
                        Value::String(s) => s,
                        other => other.to_string(),
                    });
                }
                // Transport metadata wins over same-named body fields.
                for reserved in ["success", "status", "statusText"] {
                    map.remove(reserved);
                }
                response.payload = map;
            }
            Ok(other) => {
                response.payload.insert("data".to_string(), other);
            }
            Err(e) => {
                response.success = false;
                response.error = Some(format!("invalid JSON body: {e}"));
            }
        }

        response
    }

    /// Looks up a top-level payload field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    /// Deserializes the payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Deserialize`] if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self, context: &str) -> Result<T, ClientError> {
        serde_json::from_value(Value::Object(self.payload.clone())).map_err(|source| {
            ClientError::Deserialize {
                context: context.to_string(),
                source,
            }
        })
    }

    /// The flattened object, as a `serde_json::Value`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_shape() {
        let r = NormalizedResponse::network_error("connection refused");
        assert!(!r.success);
        assert_eq!(r.status, 0);
        assert_eq!(r.status_text, "Network Error");
        assert_eq!(r.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn error_field_forces_failure_on_200() {
        let r = NormalizedResponse::from_parts(200, "OK", true, r#"{"error":"no manuals"}"#);
        assert!(!r.success);
        assert_eq!(r.status, 200);
        assert_eq!(r.error.as_deref(), Some("no manuals"));
    }

    #[test]
    fn null_error_field_is_not_a_failure() {
        let r = NormalizedResponse::from_parts(200, "OK", true, r#"{"error":null,"x":1}"#);
        assert!(r.success);
        assert!(r.error.is_none());
    }

    #[test]
    fn payload_is_flattened_with_metadata() {
        let r = NormalizedResponse::from_parts(200, "OK", true, r#"{"results":[1,2]}"#);
        let v = r.to_value();
        assert_eq!(v["success"], true);
        assert_eq!(v["status"], 200);
        assert_eq!(v["statusText"], "OK");
        assert_eq!(v["results"], serde_json::json!([1, 2]));
        assert!(v.get("error").is_none());
    }

    #[test]
    fn body_success_flag_does_not_override_status() {
        let r = NormalizedResponse::from_parts(500, "Internal Server Error", false, r#"{"success":true}"#);
        assert!(!r.success);
        assert!(r.get("success").is_none());
    }

    #[test]
    fn array_body_lands_under_data() {
        let r = NormalizedResponse::from_parts(200, "OK", true, r#"[{"id":1}]"#);
        assert!(r.success);
        assert_eq!(r.get("data"), Some(&serde_json::json!([{"id": 1}])));
    }

    #[test]
    fn non_json_body_is_failure() {
        let r = NormalizedResponse::from_parts(502, "Bad Gateway", false, "<html>oops</html>");
        assert!(!r.success);
        assert_eq!(r.status, 502);
        assert!(r.error.as_deref().unwrap().starts_with("invalid JSON body"));
    }

    #[test]
    fn empty_body_keeps_status_outcome() {
        let r = NormalizedResponse::from_parts(204, "No Content", true, "");
        assert!(r.success);
        assert!(r.payload.is_empty());
    }
}
