//! Boundary to the external language model. The pipeline consumes the
//! [`AnalysisGateway`] trait; [`gemini::GeminiGateway`] is the concrete
//! implementation. Failures here are recoverable: article content must
//! still render when analysis is down.

pub mod gemini;
pub mod types;

pub use gemini::GeminiGateway;
pub use types::{Question, VocabularyWord};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("analysis auth failure")]
    Auth,

    #[error("analysis quota exhausted")]
    Quota,

    #[error("analysis service error {status}")]
    Service { status: reqwest::StatusCode },

    #[error("analysis transport error: {0}")]
    Transport(String),

    #[error("malformed analysis response: {0}")]
    MalformedResponse(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Identify 10-15 difficult words in the article text.
    async fn analyze_vocabulary(
        &self,
        text: &str,
    ) -> Result<Vec<VocabularyWord>, AnalysisError>;

    /// Generate 4-5 comprehension questions, each with exactly 4 options.
    async fn generate_questions(&self, text: &str) -> Result<Vec<Question>, AnalysisError>;
}
