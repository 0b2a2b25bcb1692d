//! `ProjectApi` over the project server's JSON endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::kernel::services::ports::{
    ListResponse, LoadRequest, LoadResponse, ProjectApi, ProjectError, ProjectResult,
    SaveRequest, SaveResponse,
};
use crate::models::HierarchyNode;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpProjectApi {
    client: Client,
    base_url: String,
}

impl HttpProjectApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default http client");
                Client::new()
            });
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// The server reports failures in the body, often alongside a 500, so the body
/// is decoded regardless of status.
async fn decode<T: DeserializeOwned>(
    response: std::result::Result<reqwest::Response, reqwest::Error>,
) -> ProjectResult<T> {
    let response = response.map_err(|e| ProjectError::Network(e.to_string()))?;
    let status = response.status();
    response.json::<T>().await.map_err(|e| {
        tracing::debug!(%status, error = %e, "undecodable project server reply");
        ProjectError::Network(e.to_string())
    })
}

#[async_trait]
impl ProjectApi for HttpProjectApi {
    async fn save(&self, request: SaveRequest) -> ProjectResult<String> {
        tracing::debug!(name = %request.name, roots = request.data.len(), "POST /api/save");
        let response = self
            .client
            .post(self.endpoint("/api/save"))
            .json(&request)
            .send()
            .await;
        decode::<SaveResponse>(response).await?.into_result()
    }

    async fn load(&self, filename: &str) -> ProjectResult<Vec<HierarchyNode>> {
        tracing::debug!(%filename, "POST /api/load");
        let request = LoadRequest {
            filename: filename.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint("/api/load"))
            .json(&request)
            .send()
            .await;
        decode::<LoadResponse>(response).await?.into_result()
    }

    async fn list(&self) -> ProjectResult<Vec<String>> {
        tracing::debug!("GET /api/projects");
        let response = self.client.get(self.endpoint("/api/projects")).send().await;
        decode::<ListResponse>(response).await?.into_result()
    }
}
