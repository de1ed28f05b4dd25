use std::time::Duration;
use tracing::debug;

use crate::traits::PageSource;
use crate::{ImporterError, Result};

pub struct FfvbClient {
    client: reqwest::Client,
}

impl FfvbClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("ffvb-sync/0.1")
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PageSource for FfvbClient {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ImporterError::HttpStatus {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
