use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{braces::balanced_object, now, scalar_string, Page};
use crate::job::JobPost;

/// Global that Ashby-style boards assign their state object to.
const MARKER: &str = "window.__appData";
const POSTINGS_POINTER: &str = "/jobBoard/jobPostings";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Posting {
  #[serde(default)]
  id: Value,
  title: Option<String>,
  department_name: Option<String>,
  location_name: Option<String>,
  workplace_type: Option<String>,
  published_date: Option<String>,
}

impl Posting {
  fn into_job_post(self, page: &Page) -> Option<JobPost> {
    let title = self.title.filter(|t| !t.trim().is_empty())?;
    let id = scalar_string(&self.id)?;

    let categories: Vec<String> =
      [self.department_name, self.location_name, self.workplace_type]
        .into_iter()
        .flatten()
        .filter(|c| !c.trim().is_empty())
        .collect();

    let post = JobPost::new(title, page.job_link(&id), page.source)?
      .with_pub_date(Some(self.published_date.unwrap_or_else(now)));

    if categories.is_empty() {
      Some(post)
    } else {
      Some(post.with_categories(categories))
    }
  }
}

pub fn extract(page: &Page) -> Vec<JobPost> {
  let Some(data) = find_app_data(page) else {
    return vec![];
  };

  let Some(entries) = data.pointer(POSTINGS_POINTER).and_then(Value::as_array)
  else {
    debug!("{}: app data has no job postings list", page.source);
    return vec![];
  };

  entries
    .iter()
    .filter_map(|entry| {
      let posting = Posting::deserialize(entry).ok()?;
      posting.into_job_post(page)
    })
    .collect()
}

fn find_app_data(page: &Page) -> Option<Value> {
  page
    .scripts
    .iter()
    .flat_map(|script| assigned_objects(&script.text))
    .find_map(|json| match serde_json::from_str::<Value>(json) {
      Ok(data) => Some(data),
      Err(e) => {
        debug!("{}: unparseable app data: {e}", page.source);
        None
      }
    })
}

/// Object literals assigned to [`MARKER`] in a script.
fn assigned_objects(script: &str) -> impl Iterator<Item = &str> {
  script.match_indices(MARKER).filter_map(move |(i, _)| {
    let rest = script[i + MARKER.len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    balanced_object(rest)
  })
}
