//! Highest-priority strategy: the publisher's article body lives in a known
//! container, so fetch the page and take that container's inner markup.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::config::Config;
use crate::extractor::errors::StrategyError;
use crate::extractor::model::ExtractionSource;
use crate::extractor::strategy::ExtractionStrategy;
use crate::fetcher::fetch_page;

pub struct ArticleSelectorStrategy {
    selector: String,
    timeout: Duration,
}

impl ArticleSelectorStrategy {
    pub fn new(config: &Config) -> Self {
        Self {
            selector: config.article_selector().to_string(),
            timeout: config.strategy_timeout(),
        }
    }
}

#[async_trait]
impl ExtractionStrategy for ArticleSelectorStrategy {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::ArticleSelector
    }

    async fn try_extract(&self, url: &Url) -> Result<String, StrategyError> {
        let page = fetch_page(url, self.timeout).await?;

        let selector = Selector::parse(&self.selector)
            .map_err(|e| StrategyError::Malformed(format!("bad selector: {e}")))?;
        let document = Html::parse_document(&page.body_utf8);
        let container = document
            .select(&selector)
            .next()
            .ok_or(StrategyError::Empty)?;

        let inner = container.inner_html();
        if inner.trim().is_empty() {
            return Err(StrategyError::Empty);
        }
        Ok(inner)
    }
}
