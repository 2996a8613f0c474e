//! HTTP fetcher backed by reqwest

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::fetcher::SourceFetcher;
use crate::config::Config;
use crate::{Error, Result};

/// Fetches feeds over HTTP(S) with a bounded timeout and a fixed user agent
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client from the configured timeout and user agent
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(url, format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
