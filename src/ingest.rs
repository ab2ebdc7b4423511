use futures::{stream, StreamExt};
use tracing::{info, warn};

use crate::{client::Client, feed::Feed, job::JobPost};

/// Runs one ingestion cycle: every feed is fetched concurrently and the
/// results are concatenated in feed order. A failing feed contributes
/// no posts. Nothing is sorted or deduplicated across feeds.
///
/// Categories arrive normalized whichever adapter produced them, since
/// [`JobPost`] normalizes on construction.
pub async fn ingest_all(client: &Client, feeds: &[Feed]) -> Vec<JobPost> {
  // one slot per feed: all fetches are in flight at once, and results
  // still come back in feed order
  let parallelism = feeds.len().max(1);
  let fetches: Vec<_> =
    feeds.iter().map(|feed| feed.fetch_posts(client)).collect();
  let results: Vec<Vec<JobPost>> = stream::iter(fetches)
    .buffered(parallelism)
    .collect()
    .await;

  let mut posts = Vec::with_capacity(results.iter().map(Vec::len).sum());
  for (feed, feed_posts) in feeds.iter().zip(results) {
    if feed_posts.is_empty() {
      warn!("{} ({}) contributed no posts", feed.source, feed.url);
    }
    posts.extend(feed_posts);
  }

  info!("ingested {} posts from {} feeds", posts.len(), feeds.len());
  posts
}
