//! Error types for the code-signing service.

use thiserror::Error;

use crate::framework::{ErrorCode, InvalidNextToken, ValidationError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SignerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Signing profile {0} does not exist")]
    ProfileNotFound(String),

    #[error("Resource {0} does not exist")]
    ResourceNotFound(String),

    #[error(transparent)]
    InvalidNextToken(#[from] InvalidNextToken),
}

impl ErrorCode for SignerError {
    fn code(&self) -> &'static str {
        match self {
            SignerError::Validation(e) => e.code(),
            SignerError::ProfileNotFound(_) | SignerError::ResourceNotFound(_) => "ResourceNotFoundException",
            SignerError::InvalidNextToken(_) => "ValidationException",
        }
    }

    fn http_status(&self) -> u16 {
        match self {
            SignerError::ProfileNotFound(_) | SignerError::ResourceNotFound(_) => 404,
            _ => 400,
        }
    }
}
