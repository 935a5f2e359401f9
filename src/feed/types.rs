use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candidate article as listed by the syndication feed.
///
/// `content` starts as the feed-supplied summary snippet and is replaced in
/// place once the full body has been extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub genre: String,
    pub duration_minutes: u32,
    pub content: String,
    pub published: Option<DateTime<Utc>>,
}
