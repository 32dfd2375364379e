//! Element metadata lookup.

use async_trait::async_trait;
use linking::{AuthToken, ElementId, MetadataSource, SchemaMetadata};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::PlatformConfig;
use crate::error::PlatformError;

/// Header carrying the platform API token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Reads an element's key information from the platform.
pub struct ElementClient {
    client: Client,
    api_base_url: String,
}

impl ElementClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        Ok(Self {
            client: config.http_client()?,
            api_base_url: config.api_base().to_owned(),
        })
    }

    /// `GET <api_base_url>/element/<id>/key-info/`, with the id percent-encoded.
    pub fn key_info_url(&self, element_id: &ElementId) -> String {
        format!(
            "{}/element/{}/key-info/",
            self.api_base_url,
            urlencoding::encode(element_id.as_str())
        )
    }

    /// Fetches and decodes the element's metadata, surfacing every failure.
    pub async fn element_metadata(
        &self,
        element_id: &ElementId,
        token: &AuthToken,
    ) -> Result<SchemaMetadata, PlatformError> {
        let response = self
            .client
            .get(self.key_info_url(element_id))
            .header(AUTH_TOKEN_HEADER, token.expose())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)?;
        Ok(SchemaMetadata::decode(&payload))
    }
}

#[async_trait]
impl MetadataSource for ElementClient {
    #[instrument(skip_all, fields(element_id = %element_id))]
    async fn fetch_metadata(
        &self,
        element_id: &ElementId,
        token: &AuthToken,
    ) -> Option<SchemaMetadata> {
        match self.element_metadata(element_id, token).await {
            Ok(metadata) => {
                debug!(empty = metadata.is_empty(), "Element metadata decoded");
                Some(metadata)
            }
            Err(error) => {
                warn!(%error, "Element metadata lookup failed");
                None
            }
        }
    }
}
