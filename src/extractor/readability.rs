//! Second strategy: delegate extraction to an external readability service
//! that takes the article URL as a query parameter and answers with JSON.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::extractor::errors::StrategyError;
use crate::extractor::model::ExtractionSource;
use crate::extractor::strategy::ExtractionStrategy;
use crate::fetcher::{FetchError, get_client};

pub struct ReadabilityServiceStrategy {
    endpoint: String,
    timeout: Duration,
}

impl ReadabilityServiceStrategy {
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.readability_endpoint().to_string(),
            timeout: config.strategy_timeout(),
        }
    }
}

#[derive(Deserialize)]
struct ReadabilityPayload {
    content: Option<String>,
}

#[async_trait]
impl ExtractionStrategy for ReadabilityServiceStrategy {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::ReadabilityService
    }

    async fn try_extract(&self, url: &Url) -> Result<String, StrategyError> {
        let target = utf8_percent_encode(url.as_str(), NON_ALPHANUMERIC);
        let request_url = format!("{}?url={}", self.endpoint, target);

        let response = get_client()
            .get(&request_url)
            .timeout(self.timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StrategyError::Fetch(FetchError::Http { status }));
        }

        let payload: ReadabilityPayload = response
            .json()
            .await
            .map_err(|e| StrategyError::Malformed(e.to_string()))?;

        match payload.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            Some(_) => Err(StrategyError::Empty),
            None => Err(StrategyError::Malformed("missing content field".to_string())),
        }
    }
}
