use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::{
  client::ClientConfig,
  error::{ConfigError, Result},
  feed::{Feed, FeedType, SourceKind},
};

const WE_WORK_REMOTELY_RSS: &str =
  "https://weworkremotely.com/categories/remote-programming-jobs.rss";
const REMOTE_OK_RSS: &str = "https://remoteok.com/rss";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RootConfig {
  #[serde(default)]
  pub client: ClientConfig,
  #[serde(default = "default_feeds")]
  pub feeds: Vec<Feed>,
}

impl Default for RootConfig {
  fn default() -> Self {
    Self {
      client: ClientConfig::default(),
      feeds: default_feeds(),
    }
  }
}

impl RootConfig {
  pub fn load_from_file(path: &Path) -> Result<Self> {
    let f = std::fs::File::open(path)?;
    let config: Self = serde_yaml::from_reader(f).map_err(ConfigError::from)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load_from_str(s: &str) -> Result<Self> {
    let config: Self = serde_yaml::from_str(s).map_err(ConfigError::from)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    for feed in &self.feeds {
      validate_feed(feed)?;

      if feed.kind == FeedType::Structured
        && feed.source_kind() == SourceKind::Unknown
      {
        warn!(
          "structured feed {:?} is not a known provider, its posts will have no categories",
          feed.source
        );
      }
    }

    Ok(())
  }
}

fn validate_feed(feed: &Feed) -> Result<(), ConfigError> {
  let bad_feed = |reason: String| ConfigError::BadFeed {
    source_id: feed.source.clone(),
    reason,
  };

  if feed.source.trim().is_empty() {
    return Err(bad_feed("source must not be empty".into()));
  }

  match feed.url.scheme() {
    "http" | "https" => Ok(()),
    #[cfg(test)]
    "fixture" => Ok(()),
    scheme => Err(bad_feed(format!("unsupported URL scheme {scheme:?}"))),
  }
}

fn default_feeds() -> Vec<Feed> {
  [
    (WE_WORK_REMOTELY_RSS, SourceKind::WE_WORK_REMOTELY),
    (REMOTE_OK_RSS, SourceKind::REMOTE_OK),
  ]
  .into_iter()
  .filter_map(|(url, source)| {
    let url = Url::parse(url).ok()?;
    Some(Feed::new(url, source, FeedType::Structured))
  })
  .collect()
}
