use mime::Mime;
use reqwest::header::HeaderMap;
use url::Url;

use crate::error::{Error, Result};

/// A fully buffered HTTP response.
pub struct Response {
  url: Url,
  status: reqwest::StatusCode,
  headers: HeaderMap,
  body: Box<[u8]>,
}

impl Response {
  pub async fn from_reqwest_resp(resp: reqwest::Response) -> Result<Self> {
    let status = resp.status();
    let headers = resp.headers().clone();
    let url = resp.url().clone();
    let body = resp.bytes().await?.to_vec().into_boxed_slice();

    Ok(Self {
      url,
      status,
      headers,
      body,
    })
  }

  /// Serves `fixture:///<path>` from the `fixtures/` directory. A
  /// `status` query parameter overrides the response status; a missing
  /// file is reported like a failed connection.
  #[cfg(test)]
  pub(super) fn from_fixture(url: &Url) -> Result<Self> {
    use std::path::PathBuf;

    let path: PathBuf =
      format!("{}/fixtures/{}", env!("CARGO_MANIFEST_DIR"), url.path()).into();
    let query = |name: &str| {
      url
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.to_string())
    };

    let content_type = query("content_type")
      .unwrap_or_else(|| "text/xml; charset=utf-8".into());
    let status = query("status")
      .and_then(|s| s.parse::<u16>().ok())
      .and_then(|s| reqwest::StatusCode::from_u16(s).ok())
      .unwrap_or(reqwest::StatusCode::OK);

    let body = std::fs::read(&path)
      .map_err(|e| {
        Error::Message(format!("fixture {} unavailable: {e}", path.display()))
      })?
      .into_boxed_slice();

    let mut headers = HeaderMap::new();
    headers.insert(
      "content-type",
      content_type.parse().expect("invalid content-type"),
    );

    Ok(Self {
      url: url.clone(),
      status,
      headers,
      body,
    })
  }

  pub fn error_for_status(self) -> Result<Self> {
    let status = self.status;
    if status.is_client_error() || status.is_server_error() {
      return Err(Error::HttpStatus(status, self.url));
    }

    Ok(self)
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).and_then(|v| v.to_str().ok())
  }

  pub fn content_type(&self) -> Option<Mime> {
    self.header("content-type").and_then(|v| v.parse().ok())
  }

  /// Decodes the body with the charset announced in the content type,
  /// falling back to UTF-8.
  pub fn text(&self) -> String {
    let encoding = self
      .content_type()
      .and_then(|mime| {
        mime
          .get_param("charset")
          .and_then(|charset| {
            encoding_rs::Encoding::for_label(charset.as_str().as_bytes())
          })
      })
      .unwrap_or(encoding_rs::UTF_8);

    let (text, _, _) = encoding.decode(self.body());
    text.into_owned()
  }

  pub fn url(&self) -> &Url {
    &self.url
  }

  pub fn body(&self) -> &[u8] {
    &self.body
  }
}
