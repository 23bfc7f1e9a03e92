//! Error types for the delivery stream service.

use thiserror::Error;

use crate::framework::{ErrorCode, ValidationError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FirehoseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    LimitExceeded(String),

    #[error("Firehose {name} under accountId {account} already exists")]
    ResourceInUse { name: String, account: String },

    #[error("Firehose {name} under account {account} not found.")]
    ResourceNotFound { name: String, account: String },
}

impl ErrorCode for FirehoseError {
    fn code(&self) -> &'static str {
        match self {
            FirehoseError::Validation(e) => e.code(),
            FirehoseError::InvalidArgument(_) => "InvalidArgumentException",
            FirehoseError::LimitExceeded(_) => "LimitExceededException",
            FirehoseError::ResourceInUse { .. } => "ResourceInUseException",
            FirehoseError::ResourceNotFound { .. } => "ResourceNotFoundException",
        }
    }
}
