pub mod categories;
pub mod raw_item;
pub mod structured;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{client::Client, job::JobPost, scrape};

pub use raw_item::RawItem;

/// One configured upstream source.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Feed {
  pub url: Url,
  /// Stable identifier stamped on every post from this feed.
  pub source: String,
  #[serde(rename = "type")]
  pub kind: FeedType,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
  /// RSS or Atom document
  Structured,
  /// Job board HTML
  Scraped,
}

/// Upstream providers whose feeds carry categories in a known shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
  WeWorkRemotely,
  RemoteOk,
  Unknown,
}

impl SourceKind {
  pub const WE_WORK_REMOTELY: &'static str = "We Work Remotely";
  pub const REMOTE_OK: &'static str = "Remote OK";

  pub fn from_source(source: &str) -> Self {
    match source {
      Self::WE_WORK_REMOTELY => SourceKind::WeWorkRemotely,
      Self::REMOTE_OK => SourceKind::RemoteOk,
      _ => SourceKind::Unknown,
    }
  }
}

impl Feed {
  pub fn new(url: Url, source: impl Into<String>, kind: FeedType) -> Self {
    Self {
      url,
      source: source.into(),
      kind,
    }
  }

  pub fn source_kind(&self) -> SourceKind {
    SourceKind::from_source(&self.source)
  }

  /// Fetches and extracts this feed's posts. Never fails: a broken
  /// feed is logged and contributes nothing.
  pub async fn fetch_posts(&self, client: &Client) -> Vec<JobPost> {
    match self.kind {
      FeedType::Structured => structured::fetch_structured(client, self).await,
      FeedType::Scraped => {
        scrape::scrape(client, &self.url, &self.source).await
      }
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_feed_config_parse() {
    let config = r#"
      url: https://remoteok.com/rss
      source: Remote OK
      type: structured
    "#;

    let feed: Feed = serde_yaml::from_str(config).unwrap();
    assert_eq!(feed.kind, FeedType::Structured);
    assert_eq!(feed.source_kind(), SourceKind::RemoteOk);
  }

  #[test]
  fn test_feed_type_is_closed() {
    let config = r#"
      url: https://jobs.example.com
      source: Example
      type: json
    "#;

    assert!(serde_yaml::from_str::<Feed>(config).is_err());
  }

  #[test]
  fn test_source_kind_is_exact() {
    assert_eq!(
      SourceKind::from_source("We Work Remotely"),
      SourceKind::WeWorkRemotely
    );
    assert_eq!(SourceKind::from_source("remote ok"), SourceKind::Unknown);
  }
}
