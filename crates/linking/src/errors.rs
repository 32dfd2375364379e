//! Error taxonomy for link resolution and navigation.
//!
//! [`LinkError`] covers conditions that stop a resolution before any I/O
//! (invalid input). [`CredentialError`] is produced by a
//! [`crate::SecretSource`] and is recoverable: the credential cache reverts
//! to `Empty` and callers degrade to the fallback URL. [`NavigationError`] is
//! reported to the UI through [`crate::NavigationListener::on_error`].
//!
//! Metadata fetch failures have no type here: they never cross the
//! [`crate::MetadataSource`] boundary.

use std::time::Duration;

use thiserror::Error;

use crate::SchemaIntent;

// ---------------------------------------------------------------------------
// Resolution errors
// ---------------------------------------------------------------------------

/// Errors that reject a resolution or URL build outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// A required identifier was empty or whitespace-only.
    ///
    /// Produced before any network call, by every entry point.
    #[error("Invalid input: '{field}' must not be empty")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A view id override was supplied but is empty or whitespace-only.
    #[error("Invalid view id override for {intent}")]
    InvalidViewOverride {
        /// Intent whose default view id the override would have replaced.
        intent: SchemaIntent,
    },

    /// The configured base URL cannot carry a fragment.
    #[error("Invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        base_url: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Credential errors
// ---------------------------------------------------------------------------

/// Failure to obtain an external-platform auth token.
///
/// `Clone` is required: one failed fetch is delivered to every caller that
/// was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The secret-resolution endpoint could not be reached.
    #[error("Secret endpoint unreachable: {message}")]
    Transport {
        /// Transport-level error description.
        message: String,
    },

    /// The secret-resolution endpoint answered with a non-success status.
    #[error("Secret endpoint returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON document.
    #[error("Secret endpoint returned a malformed body: {message}")]
    MalformedResponse {
        /// Decoder error description.
        message: String,
    },

    /// The response decoded but carried no usable `token` field.
    #[error("Secret endpoint response has no token")]
    MissingToken,

    /// The fetch did not finish within the caller-supplied timeout.
    #[error("Secret fetch timed out after {0:?}")]
    TimedOut(Duration),
}

// ---------------------------------------------------------------------------
// Navigation errors
// ---------------------------------------------------------------------------

/// Failures surfaced to the UI by a navigator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The element id was rejected; no navigation was attempted.
    #[error("Cannot open element: {0}")]
    InvalidElement(#[from] LinkError),

    /// The browser refused to open a new tab.
    #[error("The browser blocked the new tab; allow pop-ups for this site")]
    PopupBlocked,

    /// The placeholder tab could not be redirected, even to the fallback URL.
    /// The tab has been closed.
    #[error("Could not redirect the new tab to {url}: {message}")]
    RedirectFailed {
        /// Last URL that was attempted.
        url: String,
        /// Browser-reported reason.
        message: String,
    },

    /// Clicking the new-tab anchor failed, even for the fallback URL.
    #[error("Could not open {url}: {message}")]
    AnchorFailed {
        /// Last URL that was attempted.
        url: String,
        /// Browser-reported reason.
        message: String,
    },
}

/// Error raised by a [`crate::BrowserHost`] or [`crate::PlaceholderTab`]
/// primitive (e.g. a security exception while setting a tab location).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BrowserError(pub String);

impl BrowserError {
    /// Creates a browser error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
