use async_trait::async_trait;
use url::Url;

use crate::extractor::errors::StrategyError;
use crate::extractor::model::ExtractionSource;

/// One way of turning an article URL into raw body HTML. Strategies are
/// tried in priority order; each enforces its own timeout and is abandoned,
/// not retried, on any failure.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn source(&self) -> ExtractionSource;

    async fn try_extract(&self, url: &Url) -> Result<String, StrategyError>;
}
