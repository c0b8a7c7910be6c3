//! HTTP client for the active alerts endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use stormwatch_config::FeedConfig;
use stormwatch_core::Alert;
use tracing::debug;

use crate::error::{FeedError, Result};
use crate::types::decode_alerts;

/// Media type requested from the alerts API.
pub const GEO_JSON: &str = "application/geo+json";

/// Anything that can produce the current set of active alerts.
///
/// The polling task only sees this trait, so tests can substitute a canned
/// source for the HTTP client.
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Fetch every currently active alert.
    async fn fetch_active(&self) -> Result<Vec<Alert>>;

    /// Human-readable endpoint for logs and the dashboard header.
    fn endpoint(&self) -> &str;
}

/// Client for the NWS-style alerts API.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    url: reqwest::Url,
    timeout_secs: u64,
}

impl FeedClient {
    /// Build a client from the feed settings.
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let url = parse_url(&config.url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| FeedError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            url,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }
}

fn parse_url(raw: &str) -> Result<reqwest::Url> {
    let url = reqwest::Url::parse(raw).map_err(|e| FeedError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FeedError::InvalidUrl {
            url: raw.to_string(),
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[async_trait]
impl AlertSource for FeedClient {
    async fn fetch_active(&self) -> Result<Vec<Alert>> {
        debug!("Fetching active alerts from {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FeedError::Timeout(self.timeout_secs)
                } else {
                    FeedError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::from_http_status(status.as_u16(), &body));
        }

        let body = response.bytes().await?;
        decode_alerts(&body)
    }

    fn endpoint(&self) -> &str {
        self.url.as_str()
    }
}
