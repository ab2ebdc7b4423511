use itertools::Itertools;
use regex::Regex;

use super::{now, Page};
use crate::{html::strip_markup, job::JobPost};

const MIN_TITLE_CHARS: usize = 4;
const MAX_TITLE_CHARS: usize = 199;

lazy_static::lazy_static! {
  /// Anchor patterns capturing (href, inner markup), tried in order.
  static ref LINK_PATTERNS: Vec<Regex> = [
    // href under a /jobs/ path
    r#"(?i)<a[^>]+href=["']([^"']*/jobs/[^"']*)["'][^>]*>([\s\S]*?)</a>"#,
    // anchors carrying a data-job* attribute
    r#"(?i)<a[^>]+href=["']([^"']*)["'][^>]*data-job[^>]*>([\s\S]*?)</a>"#,
    // anchors with a job-ish class
    r#"(?i)<a[^>]+href=["']([^"']+)["'][^>]*class="[^"]*job[^"]*"[^>]*>([\s\S]*?)</a>"#,
  ]
  .into_iter()
  .map(|pattern| Regex::new(pattern).expect("bad link pattern"))
  .collect();
}

/// Last resort: treats anchors that look like job links as postings.
/// The first occurrence of each link wins.
pub fn extract(page: &Page) -> Vec<JobPost> {
  LINK_PATTERNS
    .iter()
    .flat_map(|pattern| pattern.captures_iter(page.html))
    .filter_map(|caps| candidate(&caps[1], &caps[2], page))
    .unique_by(|job| job.link().to_string())
    .collect()
}

fn candidate(href: &str, inner: &str, page: &Page) -> Option<JobPost> {
  let title = strip_markup(inner);
  let title_len = title.chars().count();
  if !(MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&title_len) {
    return None;
  }

  let href = href.trim();
  if href.is_empty()
    || href.contains('#')
    || href.to_ascii_lowercase().starts_with("javascript:")
  {
    return None;
  }

  let link = page.url.join(href).ok()?;
  let post = JobPost::new(title, link.as_str(), page.source)?;
  Some(post.with_pub_date(Some(now())))
}
