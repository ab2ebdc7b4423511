use std::collections::BTreeMap;

use quick_xml::{events::Event, Reader};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
  error::{Error, Result},
  util::SingleOrVec,
};

/// Item-level elements outside the RSS schema that some providers use
/// to carry tags.
const CUSTOM_FIELDS: &[&str] = &["tags", "tag"];

/// A feed item as parsed, before any source-specific interpretation.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RawItem {
  pub title: Option<String>,
  pub link: Option<String>,
  #[serde(rename = "pubDate")]
  pub pub_date: Option<String>,
  pub content: Option<String>,
  pub categories: Option<SingleOrVec<String>>,
  pub tags: Option<SingleOrVec<String>>,
  pub tag: Option<SingleOrVec<String>>,
}

type CustomFields = BTreeMap<&'static str, Vec<String>>;

/// Parses an RSS 2.0 document, or an Atom 1.0 one if it is not RSS.
pub fn parse_feed(content: &[u8]) -> Result<Vec<RawItem>> {
  let rss_err = match rss::Channel::read_from(content) {
    Ok(channel) => return Ok(rss_items(&channel, content)),
    Err(e) => e,
  };

  match atom_syndication::Feed::read_from(content) {
    Ok(feed) => Ok(feed.entries().iter().map(atom_item).collect()),
    Err(atom_err) => Err(Error::FeedParse {
      rss: rss_err.to_string(),
      atom: atom_err.to_string(),
    }),
  }
}

fn rss_items(channel: &rss::Channel, content: &[u8]) -> Vec<RawItem> {
  let mut items: Vec<RawItem> = channel.items().iter().map(rss_item).collect();

  let custom = match custom_item_fields(content) {
    Ok(custom) => custom,
    Err(e) => {
      warn!("failed to read custom item fields: {e}");
      return items;
    }
  };

  if custom.len() != items.len() {
    debug!(
      "custom field scan saw {} items, rss saw {}; ignoring custom fields",
      custom.len(),
      items.len()
    );
    return items;
  }

  for (item, mut fields) in items.iter_mut().zip(custom) {
    item.tags = fields.remove("tags").map(SingleOrVec::from);
    item.tag = fields.remove("tag").map(SingleOrVec::from);
  }

  items
}

fn rss_item(item: &rss::Item) -> RawItem {
  let categories: Vec<String> = item
    .categories()
    .iter()
    .map(|c| c.name().to_string())
    .collect();

  RawItem {
    title: item.title().map(str::to_string),
    link: item.link().map(str::to_string),
    pub_date: item.pub_date().map(str::to_string),
    content: item.content().or(item.description()).map(str::to_string),
    categories: (!categories.is_empty()).then(|| categories.into()),
    tags: None,
    tag: None,
  }
}

fn atom_item(entry: &atom_syndication::Entry) -> RawItem {
  let link = entry
    .links()
    .iter()
    .find(|l| l.rel() == "alternate")
    .or_else(|| entry.links().first())
    .map(|l| l.href().to_string());
  let pub_date = entry.published().unwrap_or(entry.updated()).to_rfc3339();
  let content = entry
    .content()
    .and_then(|c| c.value())
    .or_else(|| entry.summary().map(|s| s.value.as_str()))
    .map(str::to_string);
  let categories: Vec<String> = entry
    .categories()
    .iter()
    .map(|c| c.term().to_string())
    .collect();

  RawItem {
    title: Some(entry.title().value.clone()),
    link,
    pub_date: Some(pub_date),
    content,
    categories: (!categories.is_empty()).then(|| categories.into()),
    tags: None,
    tag: None,
  }
}

/// Collects the text of [`CUSTOM_FIELDS`] elements that are direct
/// children of each `<item>`, one map per item in document order.
fn custom_item_fields(content: &[u8]) -> Result<Vec<CustomFields>> {
  let mut reader = Reader::from_reader(content);
  reader.config_mut().trim_text(true);

  let mut buf = Vec::new();
  let mut items = Vec::new();
  let mut current: Option<CustomFields> = None;
  let mut capture: Option<(&'static str, String)> = None;
  // element depth below the current <item>
  let mut depth = 0usize;

  loop {
    match reader.read_event_into(&mut buf)? {
      Event::Start(e) => {
        if current.is_none() {
          if e.name().as_ref() == b"item" {
            current = Some(CustomFields::new());
            depth = 0;
          }
        } else {
          depth += 1;
          if depth == 1 {
            capture = CUSTOM_FIELDS
              .iter()
              .find(|name| name.as_bytes() == e.name().as_ref())
              .map(|name| (*name, String::new()));
          }
        }
      }
      Event::End(_) if current.is_some() => {
        if depth == 0 {
          items.extend(current.take());
        } else {
          if depth == 1 {
            if let (Some((name, text)), Some(fields)) =
              (capture.take(), current.as_mut())
            {
              fields.entry(name).or_default().push(text);
            }
          }
          depth -= 1;
        }
      }
      Event::Text(t) => {
        if let Some((_, text)) = capture.as_mut() {
          let unescaped = t
            .unescape()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
          text.push_str(&unescaped);
        }
      }
      Event::CData(c) => {
        if let Some((_, text)) = capture.as_mut() {
          text.push_str(&String::from_utf8_lossy(&c));
        }
      }
      Event::Eof => break,
      _ => {}
    }
    buf.clear();
  }

  Ok(items)
}

#[cfg(test)]
mod test {
  use super::*;

  const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Jobs</title>
    <link>https://example.com</link>
    <description>jobs</description>
    <item>
      <title>Rust Engineer</title>
      <link>https://example.com/1</link>
      <pubDate>Mon, 14 Oct 2024 09:30:00 +0000</pubDate>
      <category>Back-End Programming</category>
      <tags>rust, backend</tags>
      <description>plain description</description>
      <content:encoded><![CDATA[<p>full body</p>]]></content:encoded>
    </item>
    <item>
      <title>Designer</title>
      <tag>design</tag>
      <tag>ui</tag>
      <description>only a description</description>
    </item>
  </channel>
</rss>"#;

  #[test]
  fn test_parse_rss_with_custom_fields() {
    let items = parse_feed(RSS.as_bytes()).unwrap();
    assert_eq!(items.len(), 2);

    let first = &items[0];
    assert_eq!(first.title.as_deref(), Some("Rust Engineer"));
    assert_eq!(first.link.as_deref(), Some("https://example.com/1"));
    assert_eq!(first.content.as_deref(), Some("<p>full body</p>"));
    assert_eq!(
      first.categories,
      Some(SingleOrVec::Single("Back-End Programming".into()))
    );
    assert_eq!(first.tags, Some(SingleOrVec::Single("rust, backend".into())));
    assert_eq!(first.tag, None);

    let second = &items[1];
    assert_eq!(second.link, None);
    assert_eq!(second.content.as_deref(), Some("only a description"));
    assert_eq!(
      second.tag,
      Some(SingleOrVec::Vec(vec!["design".into(), "ui".into()]))
    );
  }

  #[test]
  fn test_parse_atom() {
    let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Jobs</title>
  <id>urn:jobs</id>
  <updated>2024-10-14T09:30:00Z</updated>
  <entry>
    <title>Frontend Developer</title>
    <id>urn:jobs:1</id>
    <link rel="alternate" href="https://example.com/jobs/1"/>
    <updated>2024-10-14T09:30:00Z</updated>
    <category term="Front End"/>
    <summary>summary</summary>
  </entry>
</feed>"#;

    let items = parse_feed(atom.as_bytes()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title.as_deref(), Some("Frontend Developer"));
    assert_eq!(items[0].link.as_deref(), Some("https://example.com/jobs/1"));
    assert_eq!(items[0].pub_date.as_deref(), Some("2024-10-14T09:30:00+00:00"));
    assert_eq!(
      items[0].categories,
      Some(SingleOrVec::Single("Front End".into()))
    );
  }

  #[test]
  fn test_malformed_xml_is_an_error() {
    assert!(parse_feed(b"<html><body>not a feed").is_err());
    assert!(parse_feed(b"").is_err());
  }
}
