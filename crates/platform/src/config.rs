//! Endpoint configuration.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

pub const DEFAULT_API_BASE_URL: &str = "https://rental.example.com/api";
pub const DEFAULT_SECRET_ENDPOINT: &str = "https://rental.example.com/secrets/resolve";
pub const DEFAULT_SECRET_NAME: &str = "platform-api-token";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Where the platform lives and how to authenticate against it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Prefix for the element endpoints, without a trailing slash.
    pub api_base_url: String,
    /// Full URL of the secret-resolution endpoint.
    pub secret_endpoint: String,
    /// Name of the secret holding the platform API token.
    pub secret_name: String,
    /// Bearer key for the secret endpoint, if it requires one.
    pub secret_api_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            secret_endpoint: DEFAULT_SECRET_ENDPOINT.to_owned(),
            secret_name: DEFAULT_SECRET_NAME.to_owned(),
            secret_api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("api_base_url", &self.api_base_url)
            .field("secret_endpoint", &self.secret_endpoint)
            .field("secret_name", &self.secret_name)
            .field(
                "secret_api_key",
                &self.secret_api_key.as_ref().map(|_| "***"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl PlatformConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks that every endpoint is usable.
    pub fn validate(&self) -> Result<(), PlatformError> {
        if self.api_base_url.trim().is_empty() {
            return Err(PlatformError::Config("api_base_url must not be empty".into()));
        }
        if self.secret_endpoint.trim().is_empty() {
            return Err(PlatformError::Config(
                "secret_endpoint must not be empty".into(),
            ));
        }
        if self.secret_name.trim().is_empty() {
            return Err(PlatformError::Config("secret_name must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(PlatformError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// `api_base_url` with any trailing slashes removed.
    pub(crate) fn api_base(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    /// Builds the HTTP client shared by the adapters.
    pub(crate) fn http_client(&self) -> Result<Client, PlatformError> {
        self.validate()?;
        Ok(Client::builder().timeout(self.request_timeout()).build()?)
    }
}
