use anyhow::Result;
use lectern::{
    cache::SessionCache,
    config::Config,
    feed::FeedClient,
    pipeline::ReaderPipeline,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let cache = SessionCache::in_memory();
    let feed = FeedClient::new(&config, cache.clone());
    let pipeline = ReaderPipeline::new(&config, cache);

    let mut articles = feed.fetch_articles(false).await?;
    println!("{} articles in feed:", articles.len());
    for article in &articles {
        println!(
            "  [{}] {} — {} ({} min)",
            article.genre, article.title, article.author, article.duration_minutes
        );
    }

    if let Some(first) = articles.first_mut() {
        let result = pipeline.resolve(first).await?;
        println!(
            "\nresolved '{}' via {} ({} bytes{})",
            first.title,
            result.source.label(),
            result.html.len(),
            if result.is_fallback() {
                ", placeholder"
            } else {
                ""
            }
        );
    }

    Ok(())
}
