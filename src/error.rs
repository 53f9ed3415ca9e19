//! Error handling for the CRM dashboard client

use std::fmt;
use thiserror::Error;

/// The remote operation an error or result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Listing a page of customers
    Fetch,
    /// Partial update of a single customer
    Update,
    /// Removal of a single customer
    Delete,
    /// Creation of a new customer
    Create,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operation::Fetch => "fetch customers",
            Operation::Update => "update customer",
            Operation::Delete => "delete customer",
            Operation::Create => "create customer",
        };
        f.write_str(text)
    }
}

/// Unified error type for the CRM dashboard client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with a non-success status
    #[error("Failed to {operation}: {status_text}")]
    Api {
        operation: Operation,
        status: u16,
        status_text: String,
    },

    /// Caller supplied a value the client cannot use
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an API error from a response status
    pub fn api(operation: Operation, status: reqwest::StatusCode) -> Self {
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());
        Error::Api {
            operation,
            status: status.as_u16(),
            status_text,
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// HTTP status code, when the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// An error attributed to the operation that produced it.
///
/// This is what the collection keeps in its error slot, so a banner can show
/// which request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    pub operation: Operation,
    pub message: String,
}

impl OperationError {
    pub fn new(operation: Operation, error: &Error) -> Self {
        Self {
            operation,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn api_error_carries_status_text() {
        let err = Error::api(Operation::Fetch, StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Failed to fetch customers: Not Found");
        assert_eq!(err.status(), Some(404));

        let err = Error::api(Operation::Delete, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Failed to delete customer: Internal Server Error"
        );
    }

    #[test]
    fn unknown_status_falls_back_to_code() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = Error::api(Operation::Update, status);
        assert_eq!(err.to_string(), "Failed to update customer: 599");
    }

    #[test]
    fn operation_error_keeps_message() {
        let err = Error::api(Operation::Create, StatusCode::BAD_REQUEST);
        let slot = OperationError::new(Operation::Create, &err);
        assert_eq!(slot.operation, Operation::Create);
        assert_eq!(slot.to_string(), "Failed to create customer: Bad Request");
    }
}
