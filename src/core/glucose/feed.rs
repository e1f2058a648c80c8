//! HTTP access to the Nightscout feed.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{GlucmonError, Result};

const USER_AGENT: &str = concat!("glucmon/", env!("CARGO_PKG_VERSION"));

/// A single feed request.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub url: Url,
    pub timeout: Duration,
}

/// Source of raw feed bodies.
///
/// Implementations return the body of a 200 answer and a transport error for
/// anything else; parsing is left to the caller.
#[async_trait]
pub trait FeedClient: Send + Sync {
    async fn fetch(&self, request: &FeedRequest) -> Result<String>;
}

/// reqwest based client for a Nightscout server.
#[derive(Debug, Clone)]
pub struct NightscoutClient {
    client: reqwest::Client,
}

impl NightscoutClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GlucmonError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedClient for NightscoutClient {
    async fn fetch(&self, request: &FeedRequest) -> Result<String> {
        let response = self
            .client
            .get(request.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(GlucmonError::transport(format!(
                "feed returned HTTP {}",
                status.as_u16()
            )));
        }

        Ok(response.text().await?)
    }
}
