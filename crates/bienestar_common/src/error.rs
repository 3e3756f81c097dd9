use std::fmt;
use thiserror::Error;

/// The base error type for all Bienestar errors.
///
/// Each crate keeps its own error enum and implements `From<CrateError> for BienestarError`
/// so handlers can map everything onto one HTTP response shape.
#[derive(Error, Debug)]
pub enum BienestarError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication or authorization
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The backing store could not be reached or answered with an error
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already taken)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// The request was well formed but cannot be honoured (e.g., time outside the schedule)
    #[error("Unprocessable: {0}")]
    UnprocessableError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BienestarError {
    fn status_code(&self) -> u16 {
        match self {
            BienestarError::ParseError(_) => 400,
            BienestarError::ConfigError(_) => 500,
            BienestarError::AuthError(_) => 401,
            BienestarError::ValidationError(_) => 400,
            BienestarError::DataUnavailable(_) => 503,
            BienestarError::ExternalServiceError { .. } => 502,
            BienestarError::ConflictError(_) => 409,
            BienestarError::UnprocessableError(_) => 422,
            BienestarError::NotFoundError(_) => 404,
            BienestarError::InternalError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for BienestarError {
    fn from(err: serde_json::Error) -> Self {
        BienestarError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for BienestarError {
    fn from(err: std::io::Error) -> Self {
        BienestarError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> BienestarError {
    BienestarError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> BienestarError {
    BienestarError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> BienestarError {
    BienestarError::ConflictError(message.to_string())
}

pub fn unprocessable<T: fmt::Display>(message: T) -> BienestarError {
    BienestarError::UnprocessableError(message.to_string())
}

pub fn service_unavailable<T: fmt::Display>(message: T) -> BienestarError {
    BienestarError::DataUnavailable(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> BienestarError {
    BienestarError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> BienestarError {
    BienestarError::InternalError(message.to_string())
}
