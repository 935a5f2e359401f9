//! Syndication feed ingestion: fetch the configured feed, normalize its
//! entries into [`ArticleSummary`] values and keep the batch in the session
//! cache.

pub mod errors;
pub mod types;

pub use errors::FeedError;
pub use types::ArticleSummary;

use std::collections::HashSet;
use std::time::Duration;

use feed_rs::model::{Category, Entry, Feed};
use feed_rs::parser;
use tracing::{debug, instrument};
use url::Url;

use crate::cache::SessionCache;
use crate::config::Config;
use crate::fetcher::get_client;
use crate::sanitizer::serialize_children;

const FEED_TIMEOUT: Duration = Duration::from_secs(10);
const FEED_ACCEPT: &str =
    "application/rss+xml, application/atom+xml, application/xml;q=0.9, */*;q=0.8";

/// Label used when the feed supplies no category for an entry.
const DEFAULT_GENRE: &str = "Essay";
const WORDS_PER_MINUTE: usize = 200;

pub struct FeedClient {
    feed_url: String,
    cache: SessionCache,
}

impl FeedClient {
    pub fn new(config: &Config, cache: SessionCache) -> Self {
        Self {
            feed_url: config.feed_url().to_string(),
            cache,
        }
    }

    /// Fetch the article batch, served from the session cache unless
    /// `force_refresh` is set. A successful fetch overwrites the cache; a
    /// failed one leaves any previous batch untouched.
    #[instrument(skip(self))]
    pub async fn fetch_articles(
        &self,
        force_refresh: bool,
    ) -> Result<Vec<ArticleSummary>, FeedError> {
        if !force_refresh
            && let Some(batch) = self.cache.articles()
        {
            debug!(count = batch.len(), "serving article batch from cache");
            return Ok(batch);
        }

        let response = get_client()
            .get(&self.feed_url)
            .timeout(FEED_TIMEOUT)
            .header(reqwest::header::ACCEPT, FEED_ACCEPT)
            .send()
            .await
            .map_err(FeedError::transport)?;

        if !response.status().is_success() {
            return Err(FeedError::status(response.status()));
        }

        let body = response.bytes().await.map_err(FeedError::transport)?;
        let feed = parser::parse(body.as_ref()).map_err(FeedError::parse)?;

        let articles = normalize_feed(feed);
        debug!(count = articles.len(), "fetched article batch");
        self.cache.store_articles(&articles);
        Ok(articles)
    }

    /// Look one article up by id in the current batch.
    pub async fn find_article(&self, id: &str) -> Result<Option<ArticleSummary>, FeedError> {
        let articles = self.fetch_articles(false).await?;
        Ok(articles.into_iter().find(|a| a.id == id))
    }
}

/// Turn a parsed feed into display-ready summaries, preserving upstream
/// order. Entries without a title, link or content are dropped, as is
/// anything that looks like video content.
pub fn normalize_feed(feed: Feed) -> Vec<ArticleSummary> {
    let feed_name = feed.title.as_ref().map(|t| t.content.clone());
    let mut seen_ids = HashSet::new();
    feed.entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            normalize_entry(index, entry, feed_name.as_deref(), &mut seen_ids)
        })
        .collect()
}

fn normalize_entry(
    index: usize,
    entry: Entry,
    feed_name: Option<&str>,
    seen_ids: &mut HashSet<String>,
) -> Option<ArticleSummary> {
    let title = entry
        .title
        .map(|t| t.content)
        .filter(|t| !t.trim().is_empty())?;
    let url = entry.links.first().map(|l| l.href.clone())?;
    let parsed_url = Url::parse(&url).ok()?;
    if !matches!(parsed_url.scheme(), "http" | "https") {
        return None;
    }

    if is_video_entry(&entry.categories, &parsed_url) {
        return None;
    }

    let raw_content = entry
        .content
        .and_then(|c| c.body)
        .or_else(|| entry.summary.map(|s| s.content))
        .filter(|c| !c.trim().is_empty())?;
    let content = clean_summary(&unwrap_proxy_wrapper(&raw_content));

    // Feed GUID when present and unique in this batch, synthetic otherwise.
    let synthetic = (index + 1).to_string();
    let id = Some(entry.id)
        .filter(|id| !id.trim().is_empty() && seen_ids.insert(id.clone()))
        .unwrap_or(synthetic);

    let author = entry
        .authors
        .first()
        .map(|p| p.name.clone())
        .filter(|n| !n.trim().is_empty())
        .or_else(|| feed_name.map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string());

    let genre = entry
        .categories
        .first()
        .map(category_label)
        .unwrap_or_else(|| DEFAULT_GENRE.to_string());

    Some(ArticleSummary {
        id,
        title,
        author,
        url,
        genre,
        duration_minutes: estimate_duration_minutes(&content),
        content,
        published: entry.published,
    })
}

fn category_label(category: &Category) -> String {
    category
        .label
        .clone()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| category.term.clone())
}

fn is_video_entry(categories: &[Category], url: &Url) -> bool {
    let labelled_video = categories
        .iter()
        .any(|c| category_label(c).to_lowercase().contains("video"));
    labelled_video
        || url
            .path_segments()
            .is_some_and(|mut segments| segments.any(|s| s == "videos"))
}

/// Full-text proxies wrap the article body in a single `<div>`. Unwrap it
/// when the payload is exactly one such container, pass anything else
/// through untouched so single-paragraph summaries survive.
fn unwrap_proxy_wrapper(html: &str) -> String {
    use kuchiki::traits::TendrilSink;

    let document = kuchiki::parse_html().one(html);
    let Ok(body) = document.select_first("body") else {
        return html.to_string();
    };
    let body = body.as_node();

    let has_stray_text = body.children().any(|child| {
        child
            .as_text()
            .is_some_and(|text| !text.borrow().trim().is_empty())
    });
    let mut elements = body.children().filter(|c| c.as_element().is_some());
    match (elements.next(), elements.next()) {
        (Some(wrapper), None)
            if !has_stray_text
                && wrapper
                    .as_element()
                    .is_some_and(|el| el.name.local.as_ref() == "div") =>
        {
            serialize_children(&wrapper)
        }
        _ => html.to_string(),
    }
}

/// Feed summaries come from third-party proxies; scrub them before they are
/// ever rendered or cached.
fn clean_summary(html: &str) -> String {
    ammonia::Builder::default().clean(html).to_string()
}

fn estimate_duration_minutes(html: &str) -> u32 {
    use kuchiki::traits::TendrilSink;

    let text = kuchiki::parse_html().one(html).text_contents();
    let words = text.split_whitespace().count();
    (words.div_ceil(WORDS_PER_MINUTE)).max(1) as u32
}
