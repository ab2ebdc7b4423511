use regex::Regex;

use super::{RawItem, SourceKind};
use crate::util::SingleOrVec;

lazy_static::lazy_static! {
  static ref EMBEDDED_TAGS: Regex =
    Regex::new(r"<tags>(.*?)</tags>").expect("bad tags regex");
}

/// Pulls the raw, not yet normalized, category strings out of a feed
/// item. Each provider encodes them differently; an unknown provider
/// yields nothing.
pub fn extract_categories(item: &RawItem, source: SourceKind) -> Vec<String> {
  match source {
    SourceKind::WeWorkRemotely => we_work_remotely(item),
    SourceKind::RemoteOk => remote_ok(item),
    SourceKind::Unknown => vec![],
  }
}

// a single <category> may come back as a scalar
fn we_work_remotely(item: &RawItem) -> Vec<String> {
  item
    .categories
    .clone()
    .map(SingleOrVec::into_vec)
    .unwrap_or_default()
}

fn remote_ok(item: &RawItem) -> Vec<String> {
  let tags = [&item.tags, &item.tag]
    .into_iter()
    .flatten()
    .find(|tags| !is_blank(tags));

  match tags {
    Some(SingleOrVec::Single(s)) => split_comma_list(s),
    Some(SingleOrVec::Vec(v)) => v.clone(),
    None => item
      .content
      .as_deref()
      .and_then(|content| EMBEDDED_TAGS.captures(content))
      .map(|caps| split_comma_list(&caps[1]))
      .unwrap_or_default(),
  }
}

fn is_blank(tags: &SingleOrVec<String>) -> bool {
  match tags {
    SingleOrVec::Single(s) => s.trim().is_empty(),
    SingleOrVec::Vec(_) => false,
  }
}

fn split_comma_list(s: &str) -> Vec<String> {
  s.split(',')
    .map(str::trim)
    .filter(|piece| !piece.is_empty())
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod test {
  use serde_json::json;

  use super::*;

  fn item(value: serde_json::Value) -> RawItem {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn test_wwr_scalar_category_is_one_element() {
    let item = item(json!({ "categories": "Full-Stack Programming" }));
    assert_eq!(
      extract_categories(&item, SourceKind::WeWorkRemotely),
      ["Full-Stack Programming"]
    );
  }

  #[test]
  fn test_wwr_list_keeps_order() {
    let item = item(json!({ "categories": ["Design", "Back-End"] }));
    assert_eq!(
      extract_categories(&item, SourceKind::WeWorkRemotely),
      ["Design", "Back-End"]
    );
    assert!(extract_categories(&RawItem::default(), SourceKind::WeWorkRemotely)
      .is_empty());
  }

  #[test]
  fn test_remote_ok_comma_string() {
    let item = item(json!({ "tags": "Backend, Remote, Senior" }));
    assert_eq!(
      extract_categories(&item, SourceKind::RemoteOk),
      ["Backend", "Remote", "Senior"]
    );
  }

  #[test]
  fn test_remote_ok_falls_back_to_tag_then_content() {
    let item1 = item(json!({ "tags": "", "tag": ["go", "k8s"] }));
    assert_eq!(extract_categories(&item1, SourceKind::RemoteOk), ["go", "k8s"]);

    let item2 = item(json!({
      "content": "<p>Apply now</p><tags>dev, , exec ,</tags>",
    }));
    assert_eq!(extract_categories(&item2, SourceKind::RemoteOk), ["dev", "exec"]);

    let item3 = item(json!({ "content": "no tags here" }));
    assert!(extract_categories(&item3, SourceKind::RemoteOk).is_empty());
  }

  #[test]
  fn test_unknown_source_is_empty() {
    let item = item(json!({ "categories": ["Rust"], "tags": "a, b" }));
    assert!(extract_categories(&item, SourceKind::Unknown).is_empty());
  }
}
