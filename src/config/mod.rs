//! Configuration handling for the application.
//!
//! Everything is read from environment variables with development defaults
//! pointing at the Aeon essay feed, so the binary works out of the box. The
//! `Config::from_env` method performs the loading; validation lives there
//! too so a bad strategy timeout fails at startup rather than mid-request.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable names. Keeping them public lets tests refer to them.
pub const ENV_FEED_URL: &str = "LECTERN_FEED_URL";
pub const ENV_SOURCE_DOMAIN: &str = "LECTERN_SOURCE_DOMAIN";
pub const ENV_READABILITY_ENDPOINT: &str = "LECTERN_READABILITY_ENDPOINT";
pub const ENV_ARTICLE_SELECTOR: &str = "LECTERN_ARTICLE_SELECTOR";
pub const ENV_STRATEGY_TIMEOUT_SECS: &str = "LECTERN_STRATEGY_TIMEOUT_SECS";
pub const ENV_ANALYSIS_API_KEY: &str = "LECTERN_ANALYSIS_API_KEY";

/// Default development values used when environment variables are absent.
const DEFAULT_FEED_URL: &str = "https://aeon.co/feed.rss";
const DEFAULT_SOURCE_DOMAIN: &str = "aeon.co";
const DEFAULT_READABILITY_ENDPOINT: &str = "https://mercury-parser-production.fly.dev/parser";
const DEFAULT_ARTICLE_SELECTOR: &str = "div.article__body";
const DEFAULT_STRATEGY_TIMEOUT_SECS: u64 = 10;

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    feed_url: String,
    source_domain: String,
    readability_endpoint: String,
    article_selector: String,
    strategy_timeout_secs: u64,
    analysis_api_key: String,
}

impl Config {
    /// Create a new config explicitly. Used by tests to point the pipeline
    /// at mock servers.
    pub fn new(
        feed_url: impl Into<String>,
        source_domain: impl Into<String>,
        readability_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            feed_url: feed_url.into(),
            source_domain: source_domain.into(),
            readability_endpoint: readability_endpoint.into(),
            article_selector: DEFAULT_ARTICLE_SELECTOR.to_string(),
            strategy_timeout_secs: DEFAULT_STRATEGY_TIMEOUT_SECS,
            analysis_api_key: String::new(),
        }
    }

    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let feed_url = env::var(ENV_FEED_URL).unwrap_or_else(|_| DEFAULT_FEED_URL.to_string());
        let source_domain =
            env::var(ENV_SOURCE_DOMAIN).unwrap_or_else(|_| DEFAULT_SOURCE_DOMAIN.to_string());
        let readability_endpoint = env::var(ENV_READABILITY_ENDPOINT)
            .unwrap_or_else(|_| DEFAULT_READABILITY_ENDPOINT.to_string());
        let article_selector = env::var(ENV_ARTICLE_SELECTOR)
            .unwrap_or_else(|_| DEFAULT_ARTICLE_SELECTOR.to_string());
        let strategy_timeout_secs = match env::var(ENV_STRATEGY_TIMEOUT_SECS) {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: ENV_STRATEGY_TIMEOUT_SECS,
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_STRATEGY_TIMEOUT_SECS,
        };
        if strategy_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_STRATEGY_TIMEOUT_SECS,
                reason: "timeout must be at least one second".to_string(),
            });
        }
        let analysis_api_key = env::var(ENV_ANALYSIS_API_KEY).unwrap_or_default();

        Ok(Self {
            feed_url,
            source_domain,
            readability_endpoint,
            article_selector,
            strategy_timeout_secs,
            analysis_api_key,
        })
    }

    /// Syndication feed endpoint listing candidate articles.
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }
    /// Host articles must belong to before extraction is attempted.
    pub fn source_domain(&self) -> &str {
        &self.source_domain
    }
    /// External readability service used as the second extraction strategy.
    pub fn readability_endpoint(&self) -> &str {
        &self.readability_endpoint
    }
    /// CSS selector for the publisher's article-body container.
    pub fn article_selector(&self) -> &str {
        &self.article_selector
    }
    /// Per-strategy budget for the extraction chain.
    pub fn strategy_timeout(&self) -> Duration {
        Duration::from_secs(self.strategy_timeout_secs)
    }
    /// API key for the language-model gateway. Empty means unauthenticated.
    pub fn analysis_api_key(&self) -> &str {
        &self.analysis_api_key
    }

    /// Override the article-body selector (tests, alternate publishers).
    pub fn with_article_selector(mut self, selector: impl Into<String>) -> Self {
        self.article_selector = selector.into();
        self
    }

    /// Override the per-strategy timeout.
    pub fn with_strategy_timeout(mut self, timeout: Duration) -> Self {
        self.strategy_timeout_secs = timeout.as_secs().max(1);
        self
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            ENV_FEED_URL,
            ENV_SOURCE_DOMAIN,
            ENV_READABILITY_ENDPOINT,
            ENV_ARTICLE_SELECTOR,
            ENV_STRATEGY_TIMEOUT_SECS,
            ENV_ANALYSIS_API_KEY,
        ] {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.feed_url(), super::DEFAULT_FEED_URL);
        assert_eq!(cfg.source_domain(), super::DEFAULT_SOURCE_DOMAIN);
        assert_eq!(cfg.article_selector(), super::DEFAULT_ARTICLE_SELECTOR);
        assert_eq!(cfg.strategy_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_FEED_URL, "https://essays.example.org/feed.xml");
            env::set_var(ENV_SOURCE_DOMAIN, "essays.example.org");
            env::set_var(ENV_STRATEGY_TIMEOUT_SECS, "8");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.feed_url(), "https://essays.example.org/feed.xml");
        assert_eq!(cfg.source_domain(), "essays.example.org");
        assert_eq!(cfg.strategy_timeout(), Duration::from_secs(8));
        clear_env();
    }

    #[test]
    fn rejects_unparseable_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_STRATEGY_TIMEOUT_SECS, "soon");
        }
        assert!(Config::from_env().is_err());
        clear_env();
    }
}
