//! Error types for the wizard library.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::models::StepId;

/// Comprehensive error type for all wizard operations.
#[derive(Error, Debug)]
pub enum WizardError {
    /// Transport-level failures talking to the REST backend
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status or envelope
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// A step name that is not part of the wizard
    #[error("Unknown step '{name}'")]
    UnknownStep { name: String },
    /// A field key that the step's field table does not declare
    #[error("Step '{step}' has no field '{field}'")]
    UnknownField { step: StepId, field: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// The address lookup service does not know the postal code
    #[error("CEP {cep} not found")]
    AddressNotFound { cep: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// A failure delivered to every caller sharing one deduplicated request
    #[error(transparent)]
    Shared(#[from] Arc<WizardError>),
}

/// Builder for creating HTTP errors with context.
pub struct HttpErrorBuilder {
    message: String,
}

impl HttpErrorBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: reqwest::Error) -> WizardError {
        WizardError::Http {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WizardError {
        WizardError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WizardError {
    /// Creates a builder for HTTP errors.
    pub fn http(message: impl Into<String>) -> HttpErrorBuilder {
        HttpErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Whether the error represents an absent resource on the backend.
    pub fn is_not_found(&self) -> bool {
        match self {
            WizardError::Api { status, .. } => *status == 404,
            WizardError::AddressNotFound { .. } => true,
            WizardError::Shared(inner) => inner.is_not_found(),
            _ => false,
        }
    }
}

/// Specialized extension trait for reqwest Results.
pub trait HttpResultExt<T> {
    /// Map transport errors with a message.
    fn http_context(self, message: &str) -> Result<T>;
}

/// Specialized extension trait for configuration-related Results.
pub trait ConfigResultExt<T> {
    /// Map any error into a configuration error with a message.
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display;
}

impl<T> HttpResultExt<T> for std::result::Result<T, reqwest::Error> {
    fn http_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WizardError::http(message).with_source(e))
    }
}

impl<T, E> ConfigResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| WizardError::Configuration {
            message: format!("{context}: {e}"),
        })
    }
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_error_is_transparent() {
        let inner = WizardError::Api {
            status: 404,
            message: "missing".to_string(),
        };
        let shared = WizardError::from(Arc::new(inner));
        assert_eq!(shared.to_string(), "API error (404): missing");
        assert!(shared.is_not_found());
    }

    #[test]
    fn test_invalid_input_builder() {
        let err = WizardError::invalid_input("areaConstruida").with_reason("not a number");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'areaConstruida': not a number"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_config_context() {
        let parsed: std::result::Result<u64, _> = "abc".parse::<u64>();
        let err = parsed.config_context("Invalid delay").unwrap_err();
        assert!(matches!(err, WizardError::Configuration { .. }));
        assert!(err.to_string().starts_with("Configuration error: Invalid delay"));
    }
}
