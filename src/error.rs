//! Error types for the usersearch library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`UserSearchError`] enum.
//!
//! # Examples
//!
//! ```
//! use usersearch::error::{UserSearchError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(UserSearchError::invalid_argument("batch size must be at least 1"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for usersearch operations.
#[derive(Error, Debug)]
pub enum UserSearchError {
    /// I/O errors (terminal input/output)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors (batch submission, document storage)
    #[error("Index error: {0}")]
    Index(String),

    /// Query-related errors (parsing, invalid ranges)
    #[error("Query error: {0}")]
    Query(String),

    /// Field-related errors
    #[error("Field error: {0}")]
    Field(String),

    /// Facet definition errors
    #[error("Facet error: {0}")]
    Facet(String),

    /// Synthetic record generation errors
    #[error("Generator error: {0}")]
    Generator(String),

    /// A projected field did not carry the type the projection declares
    #[error("Contract violation: {0}")]
    Contract(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with UserSearchError.
pub type Result<T> = std::result::Result<T, UserSearchError>;

impl UserSearchError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Query(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Query(msg.into()) // Parse errors are treated as query errors
    }

    /// Create a new field error.
    pub fn field<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Field(msg.into())
    }

    /// Create a new facet error.
    pub fn facet<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Facet(msg.into())
    }

    /// Create a new generator error.
    pub fn generator<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Generator(msg.into())
    }

    /// Create a new contract violation error.
    pub fn contract<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Contract(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        UserSearchError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Whether this error signals a projection contract violation.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, UserSearchError::Contract(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = UserSearchError::index("Test index error");
        assert_eq!(error.to_string(), "Index error: Test index error");

        let error = UserSearchError::query("Test query error");
        assert_eq!(error.to_string(), "Query error: Test query error");

        let error = UserSearchError::invalid_argument("batch size");
        assert_eq!(error.to_string(), "Error: Invalid argument: batch size");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed");
        let error = UserSearchError::from(io_error);

        match error {
            UserSearchError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_contract_violation_detection() {
        assert!(UserSearchError::contract("age is text").is_contract_violation());
        assert!(!UserSearchError::query("bad").is_contract_violation());
    }
}
