//! Error types for the wellness_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wellness_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A numeric field is non-finite, negative, or would divide by zero
    #[error("Invalid input: {field}")]
    InvalidInput { field: &'static str },

    /// A field is outside its declared domain
    #[error("Invalid input: {field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// An enum label outside the known set
    #[error("Unrecognized value for {field}: {value:?}")]
    UnrecognizedEnum { field: &'static str, value: String },

    /// No stored profile for the given key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Profile store error
    #[error("Store error: {0}")]
    Store(String),

    /// Upstream chat service error
    #[error("Chat error: {0}")]
    Chat(String),
}

/// Who is responsible for an error, for mapping onto a response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-domain request (400-class)
    Client,
    /// Unexpected failure inside the service (500-class)
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput { .. }
            | Error::OutOfRange { .. }
            | Error::UnrecognizedEnum { .. }
            | Error::NotFound(_) => ErrorKind::Client,
            _ => ErrorKind::Internal,
        }
    }

    /// Message safe to show a caller; internal details only in development mode
    pub fn public_message(&self, development: bool) -> String {
        match self.kind() {
            ErrorKind::Client => self.to_string(),
            ErrorKind::Internal if development => self.to_string(),
            ErrorKind::Internal => "Internal error".to_string(),
        }
    }
}
