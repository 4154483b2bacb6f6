// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Invalid time format
    InvalidTimeFormat(String),
    /// Invalid frame rate specification
    InvalidFrameRate(String),
    /// Marker category outside the category table
    InvalidCategory(String),
    /// Import data could not be used
    ImportFailed(String),
    /// Validation failed
    ValidationFailed(String),
    /// Internal error
    InternalError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::InvalidTimeFormat(msg) => write!(f, "Invalid time format: {}", msg),
            DomainError::InvalidFrameRate(msg) => write!(f, "Invalid frame rate: {}", msg),
            DomainError::InvalidCategory(msg) => write!(f, "Invalid category: {}", msg),
            DomainError::ImportFailed(msg) => write!(f, "Import failed: {}", msg),
            DomainError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
