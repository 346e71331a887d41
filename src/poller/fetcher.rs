// src/poller/fetcher.rs
use std::time::Duration;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use crate::utils::StatusError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Source of raw status documents. One call is one request to one endpoint.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, StatusError>;
}

pub struct HttpStatusFetcher {
    client: reqwest::Client,
}

impl HttpStatusFetcher {
    pub fn new(timeout: Duration) -> Result<Self, StatusError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StatusError::NetworkFailure(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StatusFetcher for HttpStatusFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, StatusError> {
        debug!("Fetching server status from {}", url);

        let response = self.client
            .get(url)
            .send().await
            .map_err(|e| StatusError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusError::ProtocolFailure(format!("HTTP {} from {}", status, url)));
        }

        response
            .json::<Value>().await
            .map_err(|e| StatusError::ProtocolFailure(format!("Invalid JSON from {}: {}", url, e)))
    }
}
