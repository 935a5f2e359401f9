//! Session-scoped cache for the article batch and per-article full-content
//! overrides. The storage backend is injected so tests can swap it, and the
//! typed accessors keep the key layout in one place.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extractor::model::ExtractionSource;
use crate::feed::types::ArticleSummary;

const ARTICLES_KEY: &str = "lectern.articles";
const CONTENT_KEY_PREFIX: &str = "lectern.content.";

/// Full article content is effectively immutable once published, so cached
/// overrides stay valid for an hour.
const CONTENT_TTL_SECS: i64 = 3600;

/// Minimal key-value backend. Implementations must be safe to share across
/// tasks; entries live for the session only.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// In-memory store used by the binary and the tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

/// Cached full-content override for one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedContent {
    pub html: String,
    pub source: ExtractionSource,
    pub cached_at: DateTime<Utc>,
}

impl CachedContent {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.cached_at > Duration::seconds(CONTENT_TTL_SECS)
    }
}

/// Typed view over a [`SessionStore`].
#[derive(Clone)]
pub struct SessionCache {
    store: Arc<dyn SessionStore>,
}

impl SessionCache {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The cached article batch, if one was stored this session.
    pub fn articles(&self) -> Option<Vec<ArticleSummary>> {
        let raw = self.store.get(ARTICLES_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(batch) => Some(batch),
            Err(err) => {
                // A corrupt entry is dropped rather than served.
                warn!(error = %err, "discarding unreadable article cache entry");
                self.store.remove(ARTICLES_KEY);
                None
            }
        }
    }

    pub fn store_articles(&self, articles: &[ArticleSummary]) {
        match serde_json::to_string(articles) {
            Ok(raw) => self.store.set(ARTICLES_KEY, raw),
            Err(err) => warn!(error = %err, "failed to serialize article batch"),
        }
    }

    /// Live (unexpired) full-content override for one article.
    pub fn content_override(&self, article_id: &str) -> Option<CachedContent> {
        let key = content_key(article_id);
        let raw = self.store.get(&key)?;
        let entry: CachedContent = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, article_id, "discarding unreadable content override");
                self.store.remove(&key);
                return None;
            }
        };
        if entry.is_expired(Utc::now()) {
            self.store.remove(&key);
            return None;
        }
        Some(entry)
    }

    pub fn store_content(&self, article_id: &str, html: &str, source: ExtractionSource) {
        let entry = CachedContent {
            html: html.to_string(),
            source,
            cached_at: Utc::now(),
        };
        match serde_json::to_string(&entry) {
            Ok(raw) => self.store.set(&content_key(article_id), raw),
            Err(err) => warn!(error = %err, article_id, "failed to serialize content override"),
        }
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

fn content_key(article_id: &str) -> String {
    format!("{CONTENT_KEY_PREFIX}{article_id}")
}
