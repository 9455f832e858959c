//! Replicate registry HTTP client

use std::time::Duration;

use tracing::debug;

use crate::types::{RegistryError, RegistryModel, RegistryPage};

/// Default model listing endpoint.
pub const DEFAULT_REGISTRY_URL: &str = "https://api.replicate.com/v1/models";

/// Environment variable consulted when no bearer token comes in with the
/// request.
pub const TOKEN_ENV: &str = "REPLICATE_API_TOKEN";

/// Resolve the sync token: an explicit bearer value wins, the environment
/// is the fallback. Empty strings count as absent.
pub fn resolve_token(bearer: Option<&str>) -> Option<String> {
    bearer
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()))
}

/// Registry API client.
pub struct RegistryClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .user_agent(concat!("ModelShelf/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// The model listing URL this client starts pagination from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one listing page. `url` is either the base URL or a `next`
    /// link returned by a previous page.
    pub async fn list_page(&self, url: &str, token: &str) -> Result<RegistryPage, RegistryError> {
        debug!("Fetching registry page: {}", url);

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::Upstream { status, body });
        }

        Ok(response.json().await?)
    }

    /// Fetch a single model's detail record.
    pub async fn get_model(
        &self,
        vendor: &str,
        name: &str,
        token: &str,
    ) -> Result<RegistryModel, RegistryError> {
        let url = format!("{}/{}/{}", self.base_url, vendor, name);
        debug!("Fetching registry model: {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .timeout(Duration::from_secs(15))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::Upstream { status, body });
        }

        Ok(response.json().await?)
    }
}

impl Clone for RegistryClient {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}
