//! Error types for the DNS resolver service.

use thiserror::Error;

use crate::framework::{ErrorCode, InvalidNextToken, ValidationError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolverError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    InvalidNextToken(#[from] InvalidNextToken),

    #[error("Account '{account}' has exceeded '{quota}'")]
    LimitExceeded { account: String, quota: &'static str },

    #[error("{0}")]
    ResourceExists(String),

    #[error("{0}")]
    ResourceInUse(String),

    #[error("{0}")]
    ResourceNotFound(String),
}

impl ResolverError {
    pub fn endpoint_not_found(id: &str) -> Self {
        Self::ResourceNotFound(format!("Resolver endpoint with ID '{id}' does not exist"))
    }

    pub fn rule_not_found(id: &str) -> Self {
        Self::ResourceNotFound(format!("Resolver rule with ID '{id}' does not exist"))
    }
}

impl ErrorCode for ResolverError {
    fn code(&self) -> &'static str {
        match self {
            ResolverError::Validation(e) => e.code(),
            ResolverError::InvalidParameter(_) => "InvalidParameterException",
            ResolverError::InvalidRequest(_) => "InvalidRequestException",
            ResolverError::InvalidNextToken(_) => "InvalidNextTokenException",
            ResolverError::LimitExceeded { .. } => "LimitExceededException",
            ResolverError::ResourceExists(_) => "ResourceExistsException",
            ResolverError::ResourceInUse(_) => "ResourceInUseException",
            ResolverError::ResourceNotFound(_) => "ResourceNotFoundException",
        }
    }
}
