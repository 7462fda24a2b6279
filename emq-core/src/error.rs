//! Request validation error

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Error code reported alongside every validation failure
pub const BAD_REQUEST: &str = "BAD_REQUEST";

/// A request was rejected before it left the client.
///
/// Every kind of violation (malformed names, missing or empty fields,
/// out-of-range numbers, duplicate batch keys) surfaces as this one type.
/// The message is meant to be shown to the end user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Format as a service-exception style JSON error
    pub fn to_json(&self) -> String {
        serde_json::json!(self).to_string()
    }
}

/// Serializes as the service-exception body `{"errorCode", "errMsg"}`
impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("ValidationError", 2)?;
        body.serialize_field("errorCode", BAD_REQUEST)?;
        body.serialize_field("errMsg", &self.message)?;
        body.end()
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message() {
        let error = ValidationError::new("Bad request, the messageBody is required!");
        assert_eq!(error.to_string(), "Bad request, the messageBody is required!");
    }

    #[test]
    fn test_error_json_format() {
        let error = ValidationError::new("Bad request, please check your '/' in queue name.");

        let json: serde_json::Value = serde_json::from_str(&error.to_json()).unwrap();
        assert_eq!(json["errorCode"], "BAD_REQUEST");
        assert_eq!(
            json["errMsg"],
            "Bad request, please check your '/' in queue name."
        );
    }

    #[test]
    fn test_error_json_escapes_message() {
        let message = "bad \"name\" with \\ and\ttab\nnewline";
        let error = ValidationError::new(message);
        let json: serde_json::Value = serde_json::from_str(&error.to_json()).unwrap();
        assert_eq!(json["errMsg"], message);
    }

    #[test]
    fn test_error_serializes_as_body() {
        let error = ValidationError::new("Unknown request");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            serde_json::json!({ "errorCode": "BAD_REQUEST", "errMsg": "Unknown request" })
        );
    }
}
