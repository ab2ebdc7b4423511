use std::cmp::Reverse;

use serde::Serialize;

use crate::{tag::normalize_tags, util::timestamp_or_epoch};

/// A job posting in the unified schema shared by every source.
///
/// Fields are private so that a post can only be built through
/// [`JobPost::new`], which refuses empty titles or links, and
/// [`JobPost::with_categories`], which always normalizes.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobPost {
  title: String,
  link: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub_date: Option<String>,
  source: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  categories: Option<Vec<String>>,
}

impl JobPost {
  /// Returns `None` when the title or link is blank.
  pub fn new(
    title: impl AsRef<str>,
    link: impl AsRef<str>,
    source: impl Into<String>,
  ) -> Option<Self> {
    let title = title.as_ref().trim();
    let link = link.as_ref().trim();
    if title.is_empty() || link.is_empty() {
      return None;
    }

    Some(Self {
      title: title.to_string(),
      link: link.to_string(),
      pub_date: None,
      source: source.into(),
      categories: None,
    })
  }

  pub fn with_pub_date(mut self, pub_date: Option<String>) -> Self {
    self.pub_date = pub_date.filter(|d| !d.trim().is_empty());
    self
  }

  pub fn with_categories<I, S>(mut self, raw: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.categories = Some(normalize_tags(raw));
    self
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn link(&self) -> &str {
    &self.link
  }

  pub fn pub_date(&self) -> Option<&str> {
    self.pub_date.as_deref()
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn categories(&self) -> &[String] {
    self.categories.as_deref().unwrap_or_default()
  }

  pub fn timestamp(&self) -> i64 {
    timestamp_or_epoch(self.pub_date())
  }
}

// newest first; posts without a usable date sink to the bottom
pub fn sort_newest_first(posts: &mut [JobPost]) {
  posts.sort_by_key(|post| Reverse(post.timestamp()));
}
