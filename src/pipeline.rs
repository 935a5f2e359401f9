//! Ties the pieces together: feed summary in, sanitized full content and an
//! annotated render tree out.

use kuchiki::traits::TendrilSink;
use tracing::{instrument, warn};

use crate::analysis::{AnalysisError, AnalysisGateway, VocabularyWord};
use crate::cache::SessionCache;
use crate::config::Config;
use crate::extractor::{ContentExtractor, ExtractError, ExtractionResult};
use crate::feed::ArticleSummary;
use crate::highlighter::{RenderTree, render};

pub struct ReaderPipeline {
    extractor: ContentExtractor,
    cache: SessionCache,
}

/// The final product for one article: a display-ready tree, the vocabulary
/// it was annotated with, and the analysis failure if there was one. The
/// tree is always present: analysis going down never takes the content
/// with it.
pub struct AnnotatedArticle {
    pub tree: RenderTree,
    pub vocabulary: Vec<VocabularyWord>,
    pub analysis_error: Option<AnalysisError>,
}

impl ReaderPipeline {
    pub fn new(config: &Config, cache: SessionCache) -> Self {
        Self {
            extractor: ContentExtractor::new(config),
            cache,
        }
    }

    pub fn with_extractor(extractor: ContentExtractor, cache: SessionCache) -> Self {
        Self { extractor, cache }
    }

    /// Resolve full article content, preferring a live session-cache
    /// override, and replace the summary's feed snippet in place.
    /// Placeholder results are not cached: the next attempt should get a
    /// fresh shot at the real strategies.
    #[instrument(skip_all, fields(article_id = %summary.id))]
    pub async fn resolve(
        &self,
        summary: &mut ArticleSummary,
    ) -> Result<ExtractionResult, ExtractError> {
        if let Some(cached) = self.cache.content_override(&summary.id) {
            summary.content = cached.html.clone();
            return Ok(ExtractionResult {
                html: cached.html,
                source: cached.source,
                diagnostic: None,
            });
        }

        let result = self.extractor.extract_full_content(&summary.url).await?;
        if !result.is_fallback() {
            self.cache
                .store_content(&summary.id, &result.html, result.source);
        }
        summary.content = result.html.clone();
        Ok(result)
    }

    /// Run vocabulary analysis over the article text and annotate the HTML
    /// with the result. An analysis failure is recorded, not propagated:
    /// the reader still gets the plain article.
    pub async fn annotate(&self, html: &str, gateway: &dyn AnalysisGateway) -> AnnotatedArticle {
        let text = plain_text(html);
        match gateway.analyze_vocabulary(&text).await {
            Ok(vocabulary) => AnnotatedArticle {
                tree: render(html, &vocabulary),
                vocabulary,
                analysis_error: None,
            },
            Err(err) => {
                warn!(error = %err, "vocabulary analysis failed, rendering unannotated");
                AnnotatedArticle {
                    tree: render(html, &[]),
                    vocabulary: Vec::new(),
                    analysis_error: Some(err),
                }
            }
        }
    }
}

/// Whitespace-normalized text content of an HTML snippet, the form the
/// analysis gateway expects.
pub fn plain_text(html: &str) -> String {
    let text = kuchiki::parse_html().one(html).text_contents();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use url::Url;

    use crate::analysis::MockAnalysisGateway;
    use crate::extractor::{ExtractionSource, ExtractionStrategy, StrategyError};

    struct CountingStrategy {
        calls: Arc<AtomicUsize>,
        outcome: Result<String, ()>,
    }

    #[async_trait]
    impl ExtractionStrategy for CountingStrategy {
        fn source(&self) -> ExtractionSource {
            ExtractionSource::ArticleSelector
        }

        async fn try_extract(&self, _url: &Url) -> Result<String, StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(html) => Ok(html.clone()),
                Err(()) => Err(StrategyError::Empty),
            }
        }
    }

    fn summary() -> ArticleSummary {
        ArticleSummary {
            id: "essay-1".to_string(),
            title: "On Attention".to_string(),
            author: "A. Writer".to_string(),
            url: "https://aeon.co/essays/on-attention".to_string(),
            genre: "Psychology".to_string(),
            duration_minutes: 5,
            content: "<p>feed snippet</p>".to_string(),
            published: None,
        }
    }

    fn pipeline_with(
        calls: Arc<AtomicUsize>,
        outcome: Result<String, ()>,
    ) -> ReaderPipeline {
        let extractor = ContentExtractor::with_strategies(
            "aeon.co",
            vec![Box::new(CountingStrategy { calls, outcome })],
        );
        ReaderPipeline::with_extractor(extractor, SessionCache::in_memory())
    }

    #[tokio::test]
    async fn resolve_replaces_summary_content_in_place() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with(calls.clone(), Ok("<p>full essay body</p>".to_string()));

        let mut article = summary();
        let result = pipeline.resolve(&mut article).await.unwrap();
        assert_eq!(result.source, ExtractionSource::ArticleSelector);
        assert!(article.content.contains("full essay body"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_resolve_is_served_from_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with(calls.clone(), Ok("<p>full essay body</p>".to_string()));

        let mut article = summary();
        pipeline.resolve(&mut article).await.unwrap();
        let mut again = summary();
        let result = pipeline.resolve(&mut again).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(again.content.contains("full essay body"));
        assert_eq!(result.source, ExtractionSource::ArticleSelector);
    }

    #[tokio::test]
    async fn fallback_results_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with(calls.clone(), Err(()));

        let mut article = summary();
        let first = pipeline.resolve(&mut article).await.unwrap();
        assert!(first.is_fallback());
        assert!(article.content.contains("Content Unavailable"));

        let mut again = summary();
        let second = pipeline.resolve(&mut again).await.unwrap();
        assert!(second.is_fallback());
        // Both resolves hit the strategy: nothing was cached.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn annotate_highlights_gateway_vocabulary() {
        let pipeline = pipeline_with(Arc::new(AtomicUsize::new(0)), Err(()));
        let mut gateway = MockAnalysisGateway::new();
        gateway.expect_analyze_vocabulary().returning(|_| {
            Ok(vec![VocabularyWord {
                word: "ephemeral".to_string(),
                definition: "short-lived".to_string(),
                usage_example: "The mood was ephemeral.".to_string(),
            }])
        });

        let annotated = pipeline
            .annotate("<p>The mood was ephemeral.</p>", &gateway)
            .await;
        assert!(annotated.analysis_error.is_none());
        assert_eq!(annotated.vocabulary.len(), 1);
        assert!(annotated.tree.to_html().contains("<mark"));
    }

    #[tokio::test]
    async fn annotate_survives_analysis_failure() {
        let pipeline = pipeline_with(Arc::new(AtomicUsize::new(0)), Err(()));
        let mut gateway = MockAnalysisGateway::new();
        gateway
            .expect_analyze_vocabulary()
            .returning(|_| Err(AnalysisError::Quota));

        let annotated = pipeline
            .annotate("<p>Still readable content.</p>", &gateway)
            .await;
        assert!(matches!(annotated.analysis_error, Some(AnalysisError::Quota)));
        assert!(annotated.vocabulary.is_empty());
        let html = annotated.tree.to_html();
        assert!(html.contains("Still readable content."));
        assert!(!html.contains("<mark"));
    }

    #[test]
    fn plain_text_flattens_markup_and_whitespace() {
        let text = plain_text("<p>One  two</p>\n<p>three <em>four</em></p>");
        assert_eq!(text, "One two three four");
    }
}
