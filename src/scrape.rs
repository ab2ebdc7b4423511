//! Job extraction from job board HTML.
//!
//! Boards embed their listings in different ways, so several
//! strategies are tried in a fixed order and the first one that finds
//! any job wins.

mod app_data;
mod braces;
mod hydration;
mod links;

use reqwest::header::USER_AGENT;
use scraper::Html;
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::{
  client::Client,
  error::Result,
  html::{inline_scripts, InlineScript},
  job::JobPost,
  util::SCRAPER_USER_AGENT,
};

type Strategy = fn(&Page) -> Vec<JobPost>;

/// Extraction strategies, most reliable first.
const STRATEGIES: &[(&str, Strategy)] = &[
  ("embedded app data", app_data::extract),
  ("hydration payload", hydration::extract_next_data),
  ("script json", hydration::extract_script_json),
  ("link patterns", links::extract),
];

/// A fetched page as seen by the strategies.
pub struct Page<'a> {
  url: &'a Url,
  source: &'a str,
  html: &'a str,
  scripts: Vec<InlineScript>,
}

impl<'a> Page<'a> {
  pub fn new(html: &'a str, url: &'a Url, source: &'a str) -> Self {
    let doc = Html::parse_document(html);

    Self {
      url,
      source,
      html,
      scripts: inline_scripts(&doc),
    }
  }

  /// Link to a posting on this board: the page URL without its query,
  /// followed by the posting id.
  fn job_link(&self, id: &str) -> String {
    let mut base = self.url.clone();
    base.set_query(None);
    base.set_fragment(None);
    format!("{}/{}", base.as_str().trim_end_matches('/'), id)
  }
}

/// Scrapes a job board page. Never fails: transport errors and pages
/// nothing can be extracted from both give an empty list.
pub async fn scrape(client: &Client, url: &Url, source: &str) -> Vec<JobPost> {
  match try_scrape(client, url, source).await {
    Ok(jobs) => jobs,
    Err(e) => {
      error!("error scraping {source} ({url}): {e}");
      vec![]
    }
  }
}

async fn try_scrape(
  client: &Client,
  url: &Url,
  source: &str,
) -> Result<Vec<JobPost>> {
  info!("scraping {source} from {url}");
  let response = client
    .get_with(url, |req| req.header(USER_AGENT, SCRAPER_USER_AGENT))
    .await?
    .error_for_status()?;
  let html = response.text();
  debug!("{source}: received {} bytes from {}", html.len(), response.url());

  Ok(extract_jobs(&Page::new(&html, url, source)))
}

pub fn extract_jobs(page: &Page) -> Vec<JobPost> {
  for (name, strategy) in STRATEGIES {
    let jobs = strategy(page);
    if !jobs.is_empty() {
      info!("{}: extracted {} jobs via {name}", page.source, jobs.len());
      return jobs;
    }
    debug!("{}: nothing found via {name}", page.source);
  }

  info!("{}: no jobs found", page.source);
  vec![]
}

/// Strings and numbers as text; anything else, or an empty string,
/// is treated as absent.
fn scalar_string(value: &Value) -> Option<String> {
  match value {
    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

fn now() -> String {
  chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::client::ClientConfig;

  const BOARD: &str = "https://jobs.ashbyhq.com/acme";

  fn extract(html: &str) -> Vec<JobPost> {
    let url = Url::parse(BOARD).unwrap();
    extract_jobs(&Page::new(html, &url, "Acme"))
  }

  #[test]
  fn test_job_link_drops_query() {
    let url = Url::parse("https://jobs.ashbyhq.com/acme/?utm_source=x#top")
      .unwrap();
    let page = Page::new("", &url, "Acme");
    assert_eq!(page.job_link("42"), "https://jobs.ashbyhq.com/acme/42");
  }

  #[test]
  fn test_app_data_wins_over_links() {
    let html = r#"<html><body>
      <a href="/jobs/999">Some Other Listing</a>
      <script>window.__appData = {"jobBoard": {"jobPostings": [
        {"id": "a1", "title": "Platform Engineer"}
      ]}};</script>
    </body></html>"#;

    let jobs = extract(html);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].link(), "https://jobs.ashbyhq.com/acme/a1");
  }

  #[test]
  fn test_falls_through_to_links() {
    let html = r#"<html><body>
      <script>window.__appData = {"jobBoard": {"jobPostings": []}};</script>
      <script id="__NEXT_DATA__">{"props": {"pageProps": {}}}</script>
      <a href="/jobs/7">Data Engineer</a>
    </body></html>"#;

    let jobs = extract(html);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title(), "Data Engineer");
    assert_eq!(jobs[0].link(), "https://jobs.ashbyhq.com/jobs/7");
  }

  #[test]
  fn test_nothing_to_extract() {
    assert!(extract("").is_empty());
    assert!(extract("<html><body><p>No openings</p></body></html>").is_empty());
  }

  #[test]
  fn test_scalar_string() {
    use serde_json::json;

    assert_eq!(scalar_string(&json!(" x ")), Some("x".into()));
    assert_eq!(scalar_string(&json!(42)), Some("42".into()));
    assert_eq!(scalar_string(&json!("")), None);
    assert_eq!(scalar_string(&json!(null)), None);
    assert_eq!(scalar_string(&json!(["x"])), None);
  }

  #[tokio::test]
  async fn test_scrape_fixture_and_failures() {
    let client = ClientConfig::default().build().unwrap();

    let url = Url::parse("fixture:///html/ashby.html?content_type=text/html")
      .unwrap();
    let jobs = scrape(&client, &url, "Acme").await;
    assert_eq!(jobs.len(), 2);

    let url = Url::parse("fixture:///html/ashby.html?status=403").unwrap();
    assert!(scrape(&client, &url, "Acme").await.is_empty());

    let url = Url::parse("fixture:///html/missing.html").unwrap();
    assert!(scrape(&client, &url, "Acme").await.is_empty());
  }
}
