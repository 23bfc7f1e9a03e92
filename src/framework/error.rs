//! # Exception Taxonomy at the Boundary
//!
//! Every service defines its own `thiserror` enum (see e.g. [`DsError`](crate::ds::DsError)).
//! Those enums implement [`ErrorCode`], which is all the boundary needs to turn
//! them into the single wire shape, [`ServiceError`]: `{code, message}` plus an
//! HTTP status.
//!
//! Conversion never rewrites the message. Relabeling a foreign error (say, a
//! network lookup failure surfacing from the directory service) is the job of
//! the service that caught it, not of this layer.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Implemented by every error that can cross the service boundary.
pub trait ErrorCode: std::error::Error {
    /// Machine-readable error name, e.g. `ResourceNotFoundException`.
    fn code(&self) -> &'static str;

    fn http_status(&self) -> u16 {
        400
    }
}

/// The structured error the boundary renders into the wire envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub code: String,
    pub message: String,
    #[serde(skip, default = "bad_request")]
    pub http_status: u16,
}

fn bad_request() -> u16 {
    400
}

impl ServiceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, http_status: u16) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            http_status,
        }
    }

    /// The parameter bag could not be decoded into the operation's input shape.
    pub fn serialization(e: serde_json::Error) -> Self {
        Self::new("SerializationException", e.to_string(), 400)
    }

    pub fn unknown_operation(operation: &str) -> Self {
        Self::new(
            "InvalidAction",
            format!("The action {operation} is not valid for this web service."),
            400,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("InternalFailure", message, 500)
    }
}

impl<E: ErrorCode> From<E> for ServiceError {
    fn from(e: E) -> Self {
        Self::new(e.code(), e.to_string(), e.http_status())
    }
}

/// Decodes an operation's parameter bag.
pub fn parse<T: DeserializeOwned>(params: Value) -> Result<T, ServiceError> {
    // A bare `null` stands for "no parameters".
    let params = if params.is_null() { Value::Object(Default::default()) } else { params };
    serde_json::from_value(params).map_err(ServiceError::serialization)
}

/// Encodes an operation's response object.
pub fn respond<T: Serialize>(output: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(output).map_err(|e| ServiceError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, thiserror::Error)]
    enum SampleError {
        #[error("Thing {0} does not exist")]
        Missing(String),
    }

    impl ErrorCode for SampleError {
        fn code(&self) -> &'static str {
            "ResourceNotFoundException"
        }

        fn http_status(&self) -> u16 {
            404
        }
    }

    #[test]
    fn test_conversion_preserves_code_and_message() {
        let err: ServiceError = SampleError::Missing("t-1".into()).into();
        assert_eq!(err.code, "ResourceNotFoundException");
        assert_eq!(err.message, "Thing t-1 does not exist");
        assert_eq!(err.http_status, 404);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"code": "ResourceNotFoundException", "message": "Thing t-1 does not exist"})
        );
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Input {
            #[serde(rename = "Name")]
            name: String,
        }
        let err = parse::<Input>(json!({"Name": 5})).unwrap_err();
        assert_eq!(err.code, "SerializationException");
        assert!(parse::<Input>(json!({"Name": "x"})).is_ok());
    }
}
