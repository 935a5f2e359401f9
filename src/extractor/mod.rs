//! Full-content extraction: an ordered chain of strategies, each tried once,
//! ending in a placeholder that cannot fail.

pub mod errors;
pub mod generic;
pub mod model;
pub mod placeholder;
pub mod readability;
pub mod selector;
pub mod strategy;

pub use errors::{ExtractError, StrategyError};
pub use model::{ExtractionResult, ExtractionSource};
pub use strategy::ExtractionStrategy;

use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::extractor::generic::GenericTagStrategy;
use crate::extractor::placeholder::placeholder_document;
use crate::extractor::readability::ReadabilityServiceStrategy;
use crate::extractor::selector::ArticleSelectorStrategy;
use crate::sanitizer::sanitize;

pub struct ContentExtractor {
    source_domain: String,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ContentExtractor {
    /// The production chain: known container selector, then the readability
    /// service, then bare `<article>`/`<body>` scraping.
    pub fn new(config: &Config) -> Self {
        Self::with_strategies(
            config.source_domain(),
            vec![
                Box::new(ArticleSelectorStrategy::new(config)),
                Box::new(ReadabilityServiceStrategy::new(config)),
                Box::new(GenericTagStrategy::new(config)),
            ],
        )
    }

    pub fn with_strategies(
        source_domain: impl Into<String>,
        strategies: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self {
            source_domain: source_domain.into(),
            strategies,
        }
    }

    /// Resolve clean article-body HTML for `url`. Strategy failures are
    /// absorbed: the worst outcome is the placeholder document, tagged so
    /// the caller can warn the user without losing the view.
    #[instrument(skip(self))]
    pub async fn extract_full_content(&self, url: &str) -> Result<ExtractionResult, ExtractError> {
        let parsed = Url::parse(url)?;
        if !self.is_source_url(&parsed) {
            return Err(ExtractError::InvalidSource {
                url: url.to_string(),
            });
        }

        let mut failures: Vec<String> = Vec::new();
        for strategy in &self.strategies {
            let label = strategy.source().label();
            match strategy.try_extract(&parsed).await {
                Ok(raw) if !raw.trim().is_empty() => {
                    let clean = sanitize(&raw);
                    if clean.trim().is_empty() {
                        warn!(strategy = label, "content empty after sanitization");
                        failures.push(format!("{label}: empty after sanitization"));
                        continue;
                    }
                    debug!(strategy = label, bytes = clean.len(), "extraction succeeded");
                    return Ok(ExtractionResult {
                        html: clean,
                        source: strategy.source(),
                        diagnostic: None,
                    });
                }
                Ok(_) => {
                    warn!(strategy = label, "strategy returned empty content");
                    failures.push(format!("{label}: empty content"));
                }
                Err(err) => {
                    warn!(strategy = label, error = %err, "strategy failed");
                    failures.push(format!("{label}: {err}"));
                }
            }
        }

        debug!(url, "all strategies failed, returning placeholder");
        Ok(ExtractionResult {
            html: placeholder_document(&parsed),
            source: ExtractionSource::Fallback,
            diagnostic: Some(failures.join("; ")),
        })
    }

    fn is_source_url(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        match url.host_str() {
            Some(host) => {
                host == self.source_domain
                    || host
                        .strip_suffix(&self.source_domain)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::fetcher::FetchError;

    struct StaticStrategy {
        source: ExtractionSource,
        outcome: Result<&'static str, fn() -> StrategyError>,
    }

    impl StaticStrategy {
        fn ok(source: ExtractionSource, html: &'static str) -> Box<Self> {
            Box::new(Self {
                source,
                outcome: Ok(html),
            })
        }

        fn failing(source: ExtractionSource, err: fn() -> StrategyError) -> Box<Self> {
            Box::new(Self {
                source,
                outcome: Err(err),
            })
        }
    }

    #[async_trait]
    impl ExtractionStrategy for StaticStrategy {
        fn source(&self) -> ExtractionSource {
            self.source
        }

        async fn try_extract(&self, _url: &Url) -> Result<String, StrategyError> {
            match &self.outcome {
                Ok(html) => Ok(html.to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    const URL: &str = "https://aeon.co/essays/example";

    #[tokio::test]
    async fn first_successful_strategy_wins() {
        let extractor = ContentExtractor::with_strategies(
            "aeon.co",
            vec![
                StaticStrategy::ok(ExtractionSource::ArticleSelector, "<p>from selector</p>"),
                StaticStrategy::ok(ExtractionSource::GenericTag, "<p>never reached</p>"),
            ],
        );
        let result = extractor.extract_full_content(URL).await.unwrap();
        assert_eq!(result.source, ExtractionSource::ArticleSelector);
        assert!(result.html.contains("from selector"));
        assert!(result.diagnostic.is_none());
    }

    #[tokio::test]
    async fn failure_falls_through_to_next_strategy() {
        let extractor = ContentExtractor::with_strategies(
            "aeon.co",
            vec![
                StaticStrategy::failing(ExtractionSource::ArticleSelector, || {
                    StrategyError::Fetch(FetchError::Timeout)
                }),
                StaticStrategy::ok(ExtractionSource::ReadabilityService, "<p>rescued</p>"),
            ],
        );
        let result = extractor.extract_full_content(URL).await.unwrap();
        assert_eq!(result.source, ExtractionSource::ReadabilityService);
        assert!(result.html.contains("rescued"));
    }

    #[tokio::test]
    async fn empty_content_counts_as_failure() {
        let extractor = ContentExtractor::with_strategies(
            "aeon.co",
            vec![
                StaticStrategy::ok(ExtractionSource::ArticleSelector, "   "),
                StaticStrategy::ok(ExtractionSource::GenericTag, "<p>real</p>"),
            ],
        );
        let result = extractor.extract_full_content(URL).await.unwrap();
        assert_eq!(result.source, ExtractionSource::GenericTag);
    }

    #[tokio::test]
    async fn script_only_content_counts_as_failure_after_sanitization() {
        let extractor = ContentExtractor::with_strategies(
            "aeon.co",
            vec![
                StaticStrategy::ok(
                    ExtractionSource::ArticleSelector,
                    "<script>window.tracking()</script>",
                ),
                StaticStrategy::ok(ExtractionSource::GenericTag, "<p>real</p>"),
            ],
        );
        let result = extractor.extract_full_content(URL).await.unwrap();
        assert_eq!(result.source, ExtractionSource::GenericTag);
    }

    #[tokio::test]
    async fn exhausted_chain_yields_placeholder_not_error() {
        let extractor = ContentExtractor::with_strategies(
            "aeon.co",
            vec![
                StaticStrategy::failing(ExtractionSource::ArticleSelector, || StrategyError::Empty),
                StaticStrategy::failing(ExtractionSource::ReadabilityService, || {
                    StrategyError::Malformed("bad json".to_string())
                }),
            ],
        );
        let result = extractor.extract_full_content(URL).await.unwrap();
        assert!(result.is_fallback());
        assert!(!result.html.trim().is_empty());
        assert!(result.html.contains(URL));
        let diagnostic = result.diagnostic.unwrap();
        assert!(diagnostic.contains("article-selector"));
        assert!(diagnostic.contains("readability-service"));
    }

    #[tokio::test]
    async fn sanitizes_winning_content() {
        let extractor = ContentExtractor::with_strategies(
            "aeon.co",
            vec![StaticStrategy::ok(
                ExtractionSource::ArticleSelector,
                "<p>text</p><script>bad()</script><aside>chrome</aside>",
            )],
        );
        let result = extractor.extract_full_content(URL).await.unwrap();
        assert!(result.html.contains("<p>text</p>"));
        assert!(!result.html.contains("script"));
        assert!(!result.html.contains("aside"));
    }

    #[tokio::test]
    async fn rejects_off_domain_urls() {
        let extractor = ContentExtractor::with_strategies(
            "aeon.co",
            vec![StaticStrategy::ok(
                ExtractionSource::ArticleSelector,
                "<p>never</p>",
            )],
        );
        let result = extractor
            .extract_full_content("https://evil.example.com/essays/x")
            .await;
        assert!(matches!(result, Err(ExtractError::InvalidSource { .. })));

        // Lookalike domain must not pass the suffix check.
        let result = extractor
            .extract_full_content("https://notaeon.co/essays/x")
            .await;
        assert!(matches!(result, Err(ExtractError::InvalidSource { .. })));
    }

    #[tokio::test]
    async fn accepts_subdomains_of_the_source() {
        let extractor = ContentExtractor::with_strategies(
            "aeon.co",
            vec![StaticStrategy::ok(
                ExtractionSource::ArticleSelector,
                "<p>ok</p>",
            )],
        );
        let result = extractor
            .extract_full_content("https://www.aeon.co/essays/x")
            .await
            .unwrap();
        assert_eq!(result.source, ExtractionSource::ArticleSelector);
    }

    #[tokio::test]
    async fn rejects_unparseable_urls() {
        let extractor = ContentExtractor::with_strategies("aeon.co", vec![]);
        assert!(matches!(
            extractor.extract_full_content("not a url").await,
            Err(ExtractError::InvalidUrl(_))
        ));
    }
}
