//! reqwest-backed [`Fetcher`].

use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::config::TimeoutConfig;
use crate::error::{RelayError, RelayResult};
use crate::upstream::{FetchRequest, FetchedResponse, Fetcher};

/// Shared connection-pooling client for all upstream calls.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(timeouts: &TimeoutConfig) -> RelayResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()
            .map_err(|e| RelayError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: FetchRequest) -> RelayResult<FetchedResponse> {
        let start = Instant::now();
        let response = self
            .client
            .get(&request.url)
            .headers(request.headers)
            .send()
            .await
            .map_err(|e| RelayError::upstream(&request.url, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::upstream(&request.url, e))?;

        tracing::debug!(
            url = %request.url,
            status = %status,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream fetch complete"
        );

        Ok(FetchedResponse {
            status,
            headers,
            body,
        })
    }
}
