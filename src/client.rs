mod response;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, Result};

pub use self::response::Response;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
  #[serde(default)]
  user_agent: Option<String>,
  #[serde(default)]
  accept: Option<String>,
  /// Upper bound for a single fetch. A timeout is treated like any
  /// other transport error.
  #[serde(default = "default_timeout")]
  #[serde(deserialize_with = "duration_str::deserialize_duration")]
  timeout: Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      user_agent: None,
      accept: None,
      timeout: default_timeout(),
    }
  }
}

impl ClientConfig {
  fn to_builder(&self) -> Result<reqwest::ClientBuilder, ConfigError> {
    let mut builder = reqwest::Client::builder();

    if let Some(user_agent) = &self.user_agent {
      builder = builder.user_agent(user_agent);
    } else {
      builder = builder.user_agent(crate::util::USER_AGENT);
    }

    let mut header_map = HeaderMap::new();
    if let Some(accept) = &self.accept {
      let value: HeaderValue = accept.try_into().map_err(|_| {
        ConfigError::Message(format!("invalid Accept value: {accept}"))
      })?;
      header_map.append("Accept", value);
    }

    if !header_map.is_empty() {
      builder = builder.default_headers(header_map);
    }

    Ok(builder.timeout(self.timeout))
  }

  pub fn build(&self) -> Result<Client> {
    let reqwest_client = self.to_builder()?.build()?;
    Ok(Client::new(reqwest_client))
  }
}

/// Thin wrapper around a shared `reqwest::Client`. Cloning is cheap and
/// holds no per-request state, so one instance serves every concurrent
/// ingestion.
#[derive(Clone)]
pub struct Client {
  client: reqwest::Client,
}

impl Client {
  fn new(client: reqwest::Client) -> Self {
    Self { client }
  }

  pub async fn get(&self, url: &Url) -> Result<Response> {
    self.get_with(url, |req| req).await
  }

  pub async fn get_with(
    &self,
    url: &Url,
    f: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
  ) -> Result<Response> {
    #[cfg(test)]
    if url.scheme() == "fixture" {
      return Response::from_fixture(url);
    }

    let resp = f(self.client.get(url.clone())).send().await?;
    Response::from_reqwest_resp(resp).await
  }
}

fn default_timeout() -> Duration {
  Duration::from_secs(10)
}
