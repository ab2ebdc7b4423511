use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::job::JobPost;

// Each list leads with the form the tag normalizer produces, so a
// normalized category always matches its own group.
const FRONTEND_KEYWORDS: &[&str] = &["frontend", "front-end", "front end"];
const BACKEND_KEYWORDS: &[&str] = &["backend", "back-end", "back end"];
const FULLSTACK_KEYWORDS: &[&str] = &["fullstack", "full-stack", "full stack"];

#[derive(
  Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
  All,
  FrontEnd,
  BackEnd,
  FullStack,
}

impl FilterKind {
  pub const ALL: [FilterKind; 4] = [
    FilterKind::All,
    FilterKind::FrontEnd,
    FilterKind::BackEnd,
    FilterKind::FullStack,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      FilterKind::All => "all",
      FilterKind::FrontEnd => "front-end",
      FilterKind::BackEnd => "back-end",
      FilterKind::FullStack => "full-stack",
    }
  }

  /// `None` for [`FilterKind::All`], which matches everything.
  pub fn keywords(&self) -> Option<&'static [&'static str]> {
    match self {
      FilterKind::All => None,
      FilterKind::FrontEnd => Some(FRONTEND_KEYWORDS),
      FilterKind::BackEnd => Some(BACKEND_KEYWORDS),
      FilterKind::FullStack => Some(FULLSTACK_KEYWORDS),
    }
  }

  pub fn matches(&self, post: &JobPost) -> bool {
    self
      .keywords()
      .map_or(true, |keywords| matches_filter(post, keywords))
  }
}

impl Default for FilterKind {
  fn default() -> Self {
    Self::All
  }
}

impl fmt::Display for FilterKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for FilterKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    FilterKind::ALL
      .into_iter()
      .find(|kind| kind.as_str() == s)
      .ok_or_else(|| {
        format!("unknown filter {s:?} (expected all, front-end, back-end or full-stack)")
      })
  }
}

/// True if any keyword occurs, ignoring case, in the title or in the
/// space-joined categories.
pub fn matches_filter(post: &JobPost, keywords: &[&str]) -> bool {
  let title = post.title().to_lowercase();
  let categories = post.categories().join(" ").to_lowercase();

  keywords.iter().any(|keyword| {
    let keyword = keyword.to_lowercase();
    title.contains(&keyword) || categories.contains(&keyword)
  })
}

pub fn classify(posts: &[JobPost], kind: FilterKind) -> Vec<&JobPost> {
  posts.iter().filter(|post| kind.matches(post)).collect()
}

/// Size of every classification, in one pass over the posts.
pub fn count_by_filter(posts: &[JobPost]) -> BTreeMap<FilterKind, usize> {
  let mut counts: BTreeMap<FilterKind, usize> =
    FilterKind::ALL.into_iter().map(|kind| (kind, 0)).collect();

  for post in posts {
    for kind in FilterKind::ALL {
      if kind.matches(post) {
        *counts.entry(kind).or_default() += 1;
      }
    }
  }

  counts
}

/// A filtered selection of posts along with the size of every
/// classification over the whole set.
#[derive(Serialize, Debug)]
pub struct JobListing {
  pub filter: FilterKind,
  pub count: usize,
  pub counts: BTreeMap<FilterKind, usize>,
  pub jobs: Vec<JobPost>,
}

impl JobListing {
  /// `limit` applies after filtering; `count` is the number of posts
  /// matching the filter before the limit.
  pub fn new(
    posts: Vec<JobPost>,
    filter: FilterKind,
    limit: Option<usize>,
  ) -> Self {
    let counts = count_by_filter(&posts);
    let count = counts.get(&filter).copied().unwrap_or_default();
    let jobs = posts
      .into_iter()
      .filter(|post| filter.matches(post))
      .take(limit.unwrap_or(usize::MAX))
      .collect();

    Self {
      filter,
      count,
      counts,
      jobs,
    }
  }
}
