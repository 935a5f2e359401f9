//! Last real strategy: no known container, no readability service. Take the
//! first `<article>` element, or the whole `<body>` when there is none.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::config::Config;
use crate::extractor::errors::StrategyError;
use crate::extractor::model::ExtractionSource;
use crate::extractor::strategy::ExtractionStrategy;
use crate::fetcher::fetch_page;

pub struct GenericTagStrategy {
    timeout: Duration,
}

impl GenericTagStrategy {
    pub fn new(config: &Config) -> Self {
        Self {
            timeout: config.strategy_timeout(),
        }
    }
}

#[async_trait]
impl ExtractionStrategy for GenericTagStrategy {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::GenericTag
    }

    async fn try_extract(&self, url: &Url) -> Result<String, StrategyError> {
        let page = fetch_page(url, self.timeout).await?;
        let document = Html::parse_document(&page.body_utf8);

        for selector_str in ["article", "body"] {
            let selector = Selector::parse(selector_str)
                .map_err(|e| StrategyError::Malformed(format!("bad selector: {e}")))?;
            if let Some(element) = document.select(&selector).next() {
                let inner = element.inner_html();
                if !inner.trim().is_empty() {
                    return Ok(inner);
                }
            }
        }

        Err(StrategyError::Empty)
    }
}
