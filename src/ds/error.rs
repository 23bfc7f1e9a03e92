//! Error types for the directory service.

use thiserror::Error;

use crate::framework::{ErrorCode, InvalidNextToken, ValidationError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DsError {
    /// One or more parameters failed format validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    InvalidParameter(String),

    /// A cross-referenced resource exists but cannot be used as requested.
    #[error("{0}")]
    Client(String),

    #[error("Directory limit exceeded. A maximum of {0} directories may be created")]
    DirectoryLimitExceeded(usize),

    #[error("Tag Limit is exceeding")]
    TagLimitExceeded,

    #[error("Directory {0} does not exist")]
    EntityDoesNotExist(String),

    #[error("Alias '{0}' already exists.")]
    AliasAlreadyExists(String),

    #[error(transparent)]
    InvalidNextToken(#[from] InvalidNextToken),
}

impl ErrorCode for DsError {
    fn code(&self) -> &'static str {
        match self {
            DsError::Validation(e) => e.code(),
            DsError::InvalidParameter(_) => "InvalidParameterException",
            DsError::Client(_) => "ClientException",
            DsError::DirectoryLimitExceeded(_) => "DirectoryLimitExceededException",
            DsError::TagLimitExceeded => "TagLimitExceededException",
            DsError::EntityDoesNotExist(_) => "EntityDoesNotExistException",
            DsError::AliasAlreadyExists(_) => "EntityAlreadyExistsException",
            DsError::InvalidNextToken(_) => "InvalidNextTokenException",
        }
    }
}
