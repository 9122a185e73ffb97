//! Error types for the Mailjet client.

use crate::transport::TransportError;
use thiserror::Error;

/// Result type for Mailjet operations.
pub type MailjetResult<T> = Result<T, MailjetError>;

/// Errors that can occur while translating or dispatching Mailjet calls.
///
/// `InvalidMessage` and `InvalidAttachment` are always raised before the transport is
/// touched, so a locally invalid message never produces a partial send.
#[derive(Debug, Error)]
pub enum MailjetError {
    /// Bad input shape: no recipients, empty sender
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Attachment is empty, untyped or unreadable
    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    /// Provider payload could not be parsed into the expected item shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Provider answered with a non-success status
    #[error("Mailjet API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Passed through from the transport unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<serde_json::Error> for MailjetError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl From<core_config::ConfigError> for MailjetError {
    fn from(err: core_config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
