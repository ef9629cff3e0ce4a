//! Application layer for Modelabs
//!
//! This crate orchestrates domain logic and coordinates between layers.
//!
//! ## Architecture
//!
//! The application layer owns the ports (store, blob store, dispatcher) that
//! infrastructure and worker crates implement, and the services the HTTP
//! layer calls.
//!
//! ## Modules
//!
//! - `services` - Evaluation trigger, ranking query and dataset catalog services
//! - `validation` - Input validation for dataset uploads

pub mod services;
pub mod validation;

// Re-export commonly used types
pub use services::{
    BlobStore, DatasetFilter, DatasetService, DatasetStore, DatasetUpload, EvaluationAccepted,
    EvaluationDispatcher, EvaluationTriggerService, ModelRecordStore, RankingService,
    rank_records,
};

use thiserror::Error;

/// Message returned when an evaluation request lacks a required field
pub const MISSING_PARAMETERS: &str = "Missing required parameters";

/// Application-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Uploaded payload exceeds the configured limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// A backing service or the evaluation queue cannot take more work
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApplicationError {
    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            ApplicationError::NotFound(_) => 404,
            ApplicationError::InvalidInput(_) => 400,
            ApplicationError::ValidationFailed(_) => 422,
            ApplicationError::PayloadTooLarge(_) => 413,
            ApplicationError::Internal(_) => 500,
            ApplicationError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ApplicationError::NotFound(_) => "NOT_FOUND",
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::ValidationFailed(_) => "VALIDATION_FAILED",
            ApplicationError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApplicationError::Internal(_) => "INTERNAL_ERROR",
            ApplicationError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// The message without the variant prefix, suitable for clients
    pub fn message(&self) -> &str {
        match self {
            ApplicationError::NotFound(m)
            | ApplicationError::InvalidInput(m)
            | ApplicationError::ValidationFailed(m)
            | ApplicationError::PayloadTooLarge(m)
            | ApplicationError::Internal(m)
            | ApplicationError::ServiceUnavailable(m) => m,
        }
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_http_status() {
        assert_eq!(ApplicationError::NotFound("test".to_string()).http_status(), 404);
        assert_eq!(ApplicationError::InvalidInput("test".to_string()).http_status(), 400);
        assert_eq!(ApplicationError::ValidationFailed("test".to_string()).http_status(), 422);
        assert_eq!(ApplicationError::PayloadTooLarge("test".to_string()).http_status(), 413);
        assert_eq!(ApplicationError::Internal("test".to_string()).http_status(), 500);
        assert_eq!(ApplicationError::ServiceUnavailable("test".to_string()).http_status(), 503);
    }

    #[test]
    fn test_error_message_strips_prefix() {
        let err = ApplicationError::InvalidInput(MISSING_PARAMETERS.to_string());
        assert_eq!(err.message(), "Missing required parameters");
        assert_eq!(err.to_string(), "Invalid input: Missing required parameters");
    }
}
