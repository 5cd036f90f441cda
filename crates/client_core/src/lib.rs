use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::EntryId,
    error::ServiceError,
    protocol::{CreateDreamRequest, DreamRecord, EntryCreated, HealthResponse, RenderResult},
};
use tracing::{debug, info};
use url::Url;

pub mod error;

pub use error::ClientError;

/// The two calls the orchestration core depends on, plus the read-only
/// endpoints the service exposes for browsing stored entries.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn create_dream(&self, request: &CreateDreamRequest)
        -> Result<EntryCreated, ServiceError>;
    async fn render_dream(&self, entry_id: &EntryId) -> Result<RenderResult, ServiceError>;
    async fn list_dreams(&self) -> Result<Vec<DreamRecord>, ServiceError>;
    async fn fetch_dream(&self, entry_id: &EntryId) -> Result<DreamRecord, ServiceError>;
    async fn health(&self) -> Result<HealthResponse, ServiceError>;
}

/// HTTP client for the dream generation service.
pub struct DreamServiceClient {
    http: Client,
    base_url: Url,
}

impl DreamServiceClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Builds a client whose requests give up after `timeout`. Rendering can take
    /// minutes, so keep this generous.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim()).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::UnsupportedBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl GenerationService for DreamServiceClient {
    async fn create_dream(
        &self,
        request: &CreateDreamRequest,
    ) -> Result<EntryCreated, ServiceError> {
        let url = self.endpoint(&["dreams"]);
        debug!(%url, "creating dream entry");
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(error::transport_error)?;
        let created: EntryCreated = decode(response).await?;
        info!(entry_id = %created.id, "dream entry created");
        Ok(created)
    }

    async fn render_dream(&self, entry_id: &EntryId) -> Result<RenderResult, ServiceError> {
        let url = self.endpoint(&["dreams", entry_id.as_str(), "render"]);
        debug!(%url, "requesting dream render");
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(error::transport_error)?;
        decode(response).await
    }

    async fn list_dreams(&self) -> Result<Vec<DreamRecord>, ServiceError> {
        let response = self
            .http
            .get(self.endpoint(&["dreams"]))
            .send()
            .await
            .map_err(error::transport_error)?;
        decode(response).await
    }

    async fn fetch_dream(&self, entry_id: &EntryId) -> Result<DreamRecord, ServiceError> {
        let response = self
            .http
            .get(self.endpoint(&["dreams", entry_id.as_str()]))
            .send()
            .await
            .map_err(error::transport_error)?;
        decode(response).await
    }

    async fn health(&self) -> Result<HealthResponse, ServiceError> {
        let response = self
            .http
            .get(self.endpoint(&["health"]))
            .send()
            .await
            .map_err(error::transport_error)?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceError::request_failed(status.as_u16(), &body));
    }
    response.json::<T>().await.map_err(error::decode_error)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
