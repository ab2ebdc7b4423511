mod date;

use serde::{Deserialize, Serialize};

pub use date::{parse_date, timestamp_or_epoch};

pub const USER_AGENT: &str =
  concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Sent when scraping job boards, which tend to reject clients that do
/// not look like a browser.
pub const SCRAPER_USER_AGENT: &str = concat!(
  "Mozilla/5.0 (compatible; ",
  env!("CARGO_PKG_NAME"),
  "/",
  env!("CARGO_PKG_VERSION"),
  ")"
);

/// A value that upstream documents express either as a scalar or as a
/// list, depending on how many entries there are.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum SingleOrVec<T> {
  Single(T),
  Vec(Vec<T>),
}

impl<T> SingleOrVec<T> {
  pub fn into_vec(self) -> Vec<T> {
    match self {
      SingleOrVec::Single(v) => vec![v],
      SingleOrVec::Vec(v) => v,
    }
  }
}

impl<T> From<Vec<T>> for SingleOrVec<T> {
  fn from(mut values: Vec<T>) -> Self {
    if values.len() == 1 {
      SingleOrVec::Single(values.remove(0))
    } else {
      SingleOrVec::Vec(values)
    }
  }
}
