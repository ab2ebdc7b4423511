use tracing::{error, info};

use super::{
  categories::extract_categories, raw_item::parse_feed, Feed, RawItem,
  SourceKind,
};
use crate::{client::Client, error::Result, job::JobPost};

const UNTITLED: &str = "No title";
const NO_LINK: &str = "#";

/// Fetches an RSS/Atom feed and maps its items to posts. Transport and
/// parse failures are logged and produce no posts.
pub async fn fetch_structured(client: &Client, feed: &Feed) -> Vec<JobPost> {
  match try_fetch_structured(client, feed).await {
    Ok(posts) => {
      info!("{}: {} posts from {}", feed.source, posts.len(), feed.url);
      posts
    }
    Err(e) => {
      error!("error fetching {} ({}): {e}", feed.source, feed.url);
      vec![]
    }
  }
}

async fn try_fetch_structured(
  client: &Client,
  feed: &Feed,
) -> Result<Vec<JobPost>> {
  let response = client.get(&feed.url).await?.error_for_status()?;
  let items = parse_feed(response.body())?;
  let kind = feed.source_kind();

  Ok(
    items
      .iter()
      .filter_map(|item| to_job_post(item, &feed.source, kind))
      .collect(),
  )
}

/// Missing titles and links get placeholders rather than dropping the
/// item.
pub fn to_job_post(
  item: &RawItem,
  source: &str,
  kind: SourceKind,
) -> Option<JobPost> {
  let title = non_blank(&item.title).unwrap_or(UNTITLED);
  let link = non_blank(&item.link).unwrap_or(NO_LINK);

  let post = JobPost::new(title, link, source)?
    .with_pub_date(item.pub_date.clone())
    .with_categories(extract_categories(item, kind));

  Some(post)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|v| !v.trim().is_empty())
}
