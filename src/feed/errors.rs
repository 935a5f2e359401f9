use thiserror::Error;

/// Feed failures are recoverable: the caller keeps any previously cached
/// batch and offers a retry.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("feed unavailable: {0}")]
    Unavailable(String),
}

impl FeedError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Unavailable(format!("transport: {err}"))
    }

    pub fn status(status: reqwest::StatusCode) -> Self {
        Self::Unavailable(format!("http status {status}"))
    }

    pub fn parse(err: feed_rs::parser::ParseFeedError) -> Self {
        Self::Unavailable(format!("parse: {err}"))
    }
}
