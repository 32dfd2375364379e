//! Secret-resolution client.

use async_trait::async_trait;
use linking::{AuthToken, CredentialError, SecretSource};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::PlatformConfig;
use crate::error::PlatformError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SecretRequest<'a> {
    secret_name: &'a str,
}

#[derive(Deserialize)]
struct SecretResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Resolves the platform API token through the secret endpoint.
///
/// One call to [`SecretSource::fetch_token`] is one HTTP request; caching and
/// de-duplication belong to the engine's credential cache.
pub struct SecretClient {
    client: Client,
    endpoint: String,
    secret_name: String,
    api_key: Option<String>,
}

impl SecretClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        Ok(Self {
            client: config.http_client()?,
            endpoint: config.secret_endpoint.trim().to_owned(),
            secret_name: config.secret_name.trim().to_owned(),
            api_key: config.secret_api_key.clone(),
        })
    }

    async fn request_token(&self) -> Result<Option<AuthToken>, PlatformError> {
        let mut request = self.client.post(&self.endpoint).json(&SecretRequest {
            secret_name: &self.secret_name,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let parsed: SecretResponse = serde_json::from_slice(&body)?;
        Ok(parsed.token.and_then(AuthToken::new))
    }
}

#[async_trait]
impl SecretSource for SecretClient {
    #[instrument(skip_all, fields(secret_name = %self.secret_name))]
    async fn fetch_token(&self) -> Result<AuthToken, CredentialError> {
        match self.request_token().await {
            Ok(Some(token)) => {
                debug!("Platform token resolved");
                Ok(token)
            }
            Ok(None) => {
                warn!("Secret endpoint returned no token");
                Err(CredentialError::MissingToken)
            }
            Err(error) => {
                warn!(%error, "Secret resolution failed");
                Err(error.into())
            }
        }
    }
}
