use serde::{Deserialize, Serialize};

/// Which extraction strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionSource {
    ArticleSelector,
    ReadabilityService,
    GenericTag,
    Fallback,
}

impl ExtractionSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ArticleSelector => "article-selector",
            Self::ReadabilityService => "readability-service",
            Self::GenericTag => "generic-tag",
            Self::Fallback => "fallback",
        }
    }
}

/// Sanitized article-body HTML plus provenance. `html` is never empty: an
/// empty extraction counts as strategy failure upstream, and total failure
/// yields the placeholder document instead.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub html: String,
    pub source: ExtractionSource,
    pub diagnostic: Option<String>,
}

impl ExtractionResult {
    /// True when every real strategy failed and the caller is holding the
    /// placeholder document.
    pub fn is_fallback(&self) -> bool {
        self.source == ExtractionSource::Fallback
    }
}
