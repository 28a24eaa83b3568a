//! HTTP client for the ngrok inspector API

use async_trait::async_trait;
use grokdown_core::{CapturedRecord, CapturedRecordList, RecordSource, SourceError};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default address of the local inspector.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:4040";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body returned by the inspector on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    msg: Option<String>,
}

/// HTTP client for the ngrok inspector API
pub struct InspectorClient {
    client: Client,
    base_url: String,
}

impl InspectorClient {
    /// Create a new inspector client. Trailing slashes on `base_url` are dropped.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the inspector web UI.
    pub fn inspect_url(&self) -> String {
        format!("{}/inspect/http", self.base_url)
    }

    /// Check if the inspector is reachable
    pub async fn health_check(&self) -> Result<bool, SourceError> {
        let url = self.endpoint(&["api", "status"])?;
        match self.client.get(url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) if e.is_connect() || e.is_timeout() => Ok(false),
            Err(e) => Err(self.transport_error(e)),
        }
    }

    /// List captured HTTP requests, optionally scoped to one tunnel.
    pub async fn list_requests(
        &self,
        tunnel_name: Option<&str>,
    ) -> Result<Vec<CapturedRecord>, SourceError> {
        let url = self.endpoint(&["api", "requests", "http"])?;
        debug!("Fetching from {url}");

        let mut request = self.client.get(url);
        if let Some(tunnel) = tunnel_name {
            request = request.query(&[("tunnel_name", tunnel)]);
        }
        let resp = request.send().await.map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            return Err(self.handle_error(resp).await);
        }

        let body: CapturedRecordList = self.parse(resp).await?;
        debug!("Retrieved {} requests", body.requests.len());
        Ok(body.requests)
    }

    /// Get a specific captured request by id
    pub async fn get_request(&self, id: &str) -> Result<CapturedRecord, SourceError> {
        let url = self.endpoint(&["api", "requests", "http", id])?;
        debug!("Fetching from {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(id.to_string()));
        }
        if !resp.status().is_success() {
            return Err(self.handle_error(resp).await);
        }

        self.parse(resp).await
    }

    /// `base_url` extended with percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let invalid =
            || SourceError::Parse(format!("invalid inspector URL: {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn parse<T: DeserializeOwned>(&self, resp: Response) -> Result<T, SourceError> {
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&text).map_err(|e| SourceError::Parse(e.to_string()))
    }

    fn transport_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_connect() || e.is_timeout() {
            SourceError::Connection {
                base_url: self.base_url.clone(),
            }
        } else {
            SourceError::Upstream {
                status: e.status().map_or(0, |s| s.as_u16()),
                message: e.to_string(),
            }
        }
    }

    async fn handle_error(&self, resp: Response) -> SourceError {
        let status = resp.status();
        let message = match resp.json::<ErrorResponse>().await {
            Ok(ErrorResponse { msg: Some(msg) }) => msg,
            _ => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };
        SourceError::Upstream {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl RecordSource for InspectorClient {
    async fn fetch_all(
        &self,
        tunnel_name: Option<&str>,
    ) -> Result<Vec<CapturedRecord>, SourceError> {
        self.list_requests(tunnel_name).await
    }

    async fn fetch_one(&self, id: &str) -> Result<CapturedRecord, SourceError> {
        self.get_request(id).await
    }
}
