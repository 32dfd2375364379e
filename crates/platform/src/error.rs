//! Platform adapter errors.

use linking::CredentialError;
use thiserror::Error;

/// Failure talking to the rental platform.
///
/// Metadata failures never leave this crate as errors: [`crate::ElementClient`]
/// logs them and reports "no metadata". Secret failures are converted into
/// [`CredentialError`] at the port boundary.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The configuration cannot produce a working client.
    #[error("invalid platform configuration: {0}")]
    Config(String),

    /// Connection, TLS or timeout failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("server returned HTTP {status}")]
    Status { status: u16 },

    /// The body was not the JSON document the endpoint promises.
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<PlatformError> for CredentialError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::Status { status } => CredentialError::Status { status },
            PlatformError::Json(e) => CredentialError::MalformedResponse {
                message: e.to_string(),
            },
            PlatformError::Http(e) => CredentialError::Transport {
                message: e.to_string(),
            },
            PlatformError::Config(message) => CredentialError::Transport { message },
        }
    }
}
