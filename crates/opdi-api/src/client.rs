// Device HTTP client
//
// Wraps `reqwest::Client` with device URL construction, status
// classification, and JSON decoding. Endpoint helpers live in `device.rs`
// and the event stream in `stream.rs` to keep this module focused on
// transport mechanics.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::endpoints;
use crate::error::Error;
use crate::transport::TransportConfig;

const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for a single device.
///
/// Every call is a single attempt. Retrying is the caller's business.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    stream_path: String,
    timeout_secs: u64,
}

impl DeviceClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the device root, e.g. `http://192.168.4.1`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            stream_path: endpoints::EVENT_STREAM.to_owned(),
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            stream_path: endpoints::EVENT_STREAM.to_owned(),
            timeout_secs: 0,
        }
    }

    /// Override the event stream path (default `/ws`).
    pub fn with_stream_path(mut self, path: impl Into<String>) -> Self {
        self.stream_path = path.into();
        self
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn stream_path(&self) -> &str {
        &self.stream_path
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an absolute device path: `{base}{path}`.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `GET` a path and return the decoded JSON body.
    pub async fn get_json(&self, path: &str) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        self.parse_json(resp).await
    }

    /// `GET` a path and return the raw body (e.g. a JPEG snapshot).
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes, Error> {
        let url = self.url(path)?;
        debug!("GET {} (binary)", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;
        let resp = check_status(resp).await?;

        resp.bytes().await.map_err(|e| self.classify(&e))
    }

    /// `POST` a JSON body and return the decoded JSON response.
    pub async fn post_json(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        self.parse_json(resp).await
    }

    /// `DELETE` a path and return the decoded JSON response.
    pub async fn delete(&self, path: &str) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("DELETE {}", url);

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        self.parse_json(resp).await
    }

    fn classify(&self, err: &reqwest::Error) -> Error {
        Error::from_reqwest(err, self.timeout_secs)
    }

    /// Check the status line, then decode the body as JSON.
    ///
    /// An empty body decodes to `Value::Null`; the firmware answers some
    /// commands with nothing at all.
    async fn parse_json(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let resp = check_status(resp).await?;
        let body = resp.text().await.map_err(|e| self.classify(&e))?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    } else {
        preview(&body)
    };

    Err(Error::HttpStatus {
        status: status.as_u16(),
        message,
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let client = DeviceClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://192.168.4.1/").unwrap(),
        );
        let url = client.url(endpoints::STA_STATUS).unwrap();
        assert_eq!(url.as_str(), "http://192.168.4.1/api/v1/net/sta/status");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
    }
}
