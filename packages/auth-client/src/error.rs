//! Error types for the auth client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Transport-level client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error (missing base URL or key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout, undecodable body)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request rejected as invalid (HTTP 400)
    #[error("{0}")]
    Rejected(String),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Login flow failures, surfaced to the user as a toast-style message.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter the 6-digit OTP")]
    InvalidCode,

    #[error("No OTP has been requested")]
    NoPendingCode,

    /// Server answered `success: false`
    #[error("{message}")]
    Rejected {
        reason: Option<String>,
        message: String,
    },

    #[error("Failed to set session")]
    SessionNotSet,

    #[error(transparent)]
    Client(#[from] ClientError),
}
