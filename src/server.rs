use std::sync::Arc;

use axum::{extract::Query, routing::get, Extension, Json, Router};
use clap::Parser;
use http::StatusCode;
use serde::Deserialize;
use tower_http::compression::CompressionLayer;
use tracing::info;

use crate::{
  client::Client,
  config::RootConfig,
  error::Result,
  feed::Feed,
  filter::{FilterKind, JobListing},
  ingest::ingest_all,
  job::sort_newest_first,
};

#[derive(Parser, Clone, Debug)]
pub struct ServerConfig {
  #[clap(long, short, default_value = "127.0.0.1:4080")]
  bind: String,
}

struct AppState {
  client: Client,
  feeds: Vec<Feed>,
}

#[derive(Deserialize, Debug)]
struct JobsQuery {
  #[serde(default)]
  filter: FilterKind,
  limit: Option<usize>,
}

impl ServerConfig {
  pub async fn run(self, root_config: RootConfig) -> Result<()> {
    serve(self, root_config).await
  }
}

pub async fn serve(
  server_config: ServerConfig,
  root_config: RootConfig,
) -> Result<()> {
  info!("listening on {}", server_config.bind);
  let listener = tokio::net::TcpListener::bind(&server_config.bind).await?;

  let app = router(root_config)?;

  info!("starting server");
  Ok(axum::serve(listener, app).await?)
}

fn router(root_config: RootConfig) -> Result<Router> {
  let state = AppState {
    client: root_config.client.build()?,
    feeds: root_config.feeds,
  };
  info!("serving {} feeds", state.feeds.len());

  let app = Router::new()
    .route("/", get(|| async { "job-funnel is up and running!" }))
    .route("/jobs", get(jobs))
    .route("/health", get(|| async { "ok" }))
    .fallback(get(|| async {
      (StatusCode::NOT_FOUND, "Endpoint not found")
    }))
    .layer(Extension(Arc::new(state)))
    .layer(CompressionLayer::new().gzip(true));

  Ok(app)
}

/// Every request runs a fresh ingestion cycle.
async fn jobs(
  Extension(state): Extension<Arc<AppState>>,
  Query(query): Query<JobsQuery>,
) -> Json<JobListing> {
  let mut posts = ingest_all(&state.client, &state.feeds).await;
  sort_newest_first(&mut posts);

  Json(JobListing::new(posts, query.filter, query.limit))
}

#[cfg(test)]
mod test {
  use axum::body::{to_bytes, Body};
  use http::Request;
  use serde_json::Value;
  use tower::ServiceExt;

  use super::*;

  const CONFIG: &str = r#"
    feeds:
      - url: fixture:///rss/weworkremotely.xml
        source: We Work Remotely
        type: structured
      - url: fixture:///rss/remoteok.xml
        source: Remote OK
        type: structured
      - url: fixture:///rss/unreachable.xml
        source: Remote OK
        type: structured
  "#;

  async fn get_json(uri: &str) -> (StatusCode, Value) {
    let app = router(RootConfig::load_from_str(CONFIG).unwrap()).unwrap();
    let resp = app
      .oneshot(Request::get(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
  }

  #[tokio::test]
  async fn test_all_jobs() {
    let (status, json) = get_json("/jobs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["filter"], "all");
    assert_eq!(json["count"], 5);
    assert_eq!(json["jobs"].as_array().unwrap().len(), 5);
    assert_eq!(json["counts"]["all"], 5);
  }

  #[tokio::test]
  async fn test_filter_and_limit() {
    let (status, json) = get_json("/jobs?filter=back-end&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["filter"], "back-end");
    assert_eq!(json["count"], 2);

    let jobs = json["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert!(jobs[0]["categories"]
      .as_array()
      .unwrap()
      .contains(&Value::from("backend")));
  }

  #[tokio::test]
  async fn test_newest_first() {
    let (_, json) = get_json("/jobs").await;
    let dates: Vec<i64> = json["jobs"]
      .as_array()
      .unwrap()
      .iter()
      .map(|job| crate::util::timestamp_or_epoch(job["pubDate"].as_str()))
      .collect();

    assert!(dates.windows(2).all(|w| w[0] >= w[1]));
  }

  #[tokio::test]
  async fn test_bad_filter_and_unknown_route() {
    let (status, _) = get_json("/jobs?filter=backend").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
