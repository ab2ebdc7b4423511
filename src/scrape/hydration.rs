use std::cmp::Reverse;

use serde_json::Value;
use tracing::debug;

use super::{braces::top_level_objects, now, scalar_string, Page};
use crate::job::JobPost;

/// Element id of the Next.js hydration payload.
const NEXT_DATA_ID: &str = "__NEXT_DATA__";
/// Scripts mentioning one of these may carry a job list.
const SCRIPT_MARKERS: &[&str] = &["\"jobPostings\"", "\"jobs\""];

/// Where job lists have been seen, in order of preference.
const JOB_LIST_POINTERS: &[&str] = &[
  "/props/pageProps/jobs",
  "/props/pageProps/jobPostings",
  "/props/pageProps/positions",
  "/pageProps/jobs",
  "/pageProps/jobPostings",
  "/pageProps/positions",
  "/jobBoard/jobPostings",
  "/jobs",
  "/jobPostings",
  "/positions",
];

const TITLE_FIELDS: &[&str] = &["title", "name", "position"];
const ID_FIELDS: &[&str] = &["id", "jobId"];
const CATEGORY_FIELDS: &[&str] = &["departments", "tags", "categories"];
const DATE_FIELDS: &[&str] = &["publishedAt", "createdAt"];
/// Keys naming a category when it is an object rather than a string.
const CATEGORY_NAME_FIELDS: &[&str] = &["name", "title", "label"];

/// Reads the framework hydration script.
pub fn extract_next_data(page: &Page) -> Vec<JobPost> {
  page
    .scripts
    .iter()
    .filter(|script| script.id.as_deref() == Some(NEXT_DATA_ID))
    .find_map(|script| match serde_json::from_str::<Value>(script.text.trim())
    {
      Ok(data) => Some(data),
      Err(e) => {
        debug!("{}: unparseable hydration payload: {e}", page.source);
        None
      }
    })
    .map(|data| jobs_from_data(&data, page))
    .unwrap_or_default()
}

/// Looks for a job list in any object literal inside scripts that
/// mention jobs, trying the largest objects first.
pub fn extract_script_json(page: &Page) -> Vec<JobPost> {
  let scripts = page.scripts.iter().filter(|script| {
    SCRIPT_MARKERS
      .iter()
      .any(|marker| script.text.contains(marker))
  });

  for script in scripts {
    let mut candidates = top_level_objects(&script.text);
    candidates.sort_by_key(|candidate| Reverse(candidate.len()));

    for candidate in candidates {
      let Ok(data) = serde_json::from_str::<Value>(candidate) else {
        continue;
      };

      let jobs = jobs_from_data(&data, page);
      if !jobs.is_empty() {
        return jobs;
      }
    }
  }

  vec![]
}

fn jobs_from_data(data: &Value, page: &Page) -> Vec<JobPost> {
  let Some(entries) = find_job_list(data) else {
    return vec![];
  };

  entries
    .iter()
    .filter_map(|entry| job_from_entry(entry, page))
    .collect()
}

fn find_job_list(data: &Value) -> Option<&Vec<Value>> {
  JOB_LIST_POINTERS
    .iter()
    .filter_map(|pointer| data.pointer(pointer).and_then(Value::as_array))
    .find(|list| !list.is_empty())
}

fn job_from_entry(entry: &Value, page: &Page) -> Option<JobPost> {
  let title = first_scalar(entry, TITLE_FIELDS)?;
  let id = first_scalar(entry, ID_FIELDS)?;
  let pub_date = first_scalar(entry, DATE_FIELDS).unwrap_or_else(now);
  let categories = CATEGORY_FIELDS
    .iter()
    .find_map(|field| entry.get(field).and_then(category_list));

  let post = JobPost::new(title, page.job_link(&id), page.source)?
    .with_pub_date(Some(pub_date));

  Some(match categories {
    Some(categories) => post.with_categories(categories),
    None => post,
  })
}

fn first_scalar(entry: &Value, fields: &[&str]) -> Option<String> {
  fields
    .iter()
    .find_map(|field| entry.get(field).and_then(scalar_string))
}

fn category_list(value: &Value) -> Option<Vec<String>> {
  match value {
    Value::Array(items) => Some(
      items
        .iter()
        .filter_map(|item| match item {
          Value::Object(_) => first_scalar(item, CATEGORY_NAME_FIELDS),
          other => scalar_string(other),
        })
        .collect(),
    ),
    Value::String(_) => scalar_string(value).map(|s| vec![s]),
    _ => None,
  }
}
