use thiserror::Error;

use crate::fetcher::FetchError;

/// The only extraction failure a caller ever sees. Strategy failures are
/// absorbed by the chain and resolved to the placeholder document.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("url outside source domain: {url}")]
    InvalidSource { url: String },
}

/// Why one strategy gave up. Logged, never surfaced.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("empty content")]
    Empty,

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
