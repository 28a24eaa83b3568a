//! Shared helpers for grokdown-core integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use grokdown_core::{
    CapturedRecord, HeaderMap, RecordSource, RequestData, ResponseData, SourceError,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Source that replays a scripted sequence of snapshots, one per fetch.
///
/// Once the script runs out every fetch fails with a connection error.
#[derive(Default)]
pub struct ScriptedSource {
    snapshots: Mutex<VecDeque<Result<Vec<CapturedRecord>, SourceError>>>,
    tunnels: Mutex<Vec<Option<String>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, snapshot: Vec<CapturedRecord>) -> Self {
        self.snapshots.lock().unwrap().push_back(Ok(snapshot));
        self
    }

    pub fn then_fail(self, error: SourceError) -> Self {
        self.snapshots.lock().unwrap().push_back(Err(error));
        self
    }

    /// Tunnel names passed to each `fetch_all` call, in order.
    pub fn tunnels(&self) -> Vec<Option<String>> {
        self.tunnels.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.tunnels.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn fetch_all(
        &self,
        tunnel_name: Option<&str>,
    ) -> Result<Vec<CapturedRecord>, SourceError> {
        self.tunnels
            .lock()
            .unwrap()
            .push(tunnel_name.map(str::to_string));
        self.snapshots
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(SourceError::Connection {
                    base_url: "scripted".to_string(),
                })
            })
    }

    async fn fetch_one(&self, id: &str) -> Result<CapturedRecord, SourceError> {
        Err(SourceError::NotFound(id.to_string()))
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
}

/// Builder for captured records.
pub struct RecordBuilder {
    record: CapturedRecord,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            record: CapturedRecord {
                uri: format!("/api/requests/http/{id}"),
                id: id.to_string(),
                tunnel_name: "command_line".to_string(),
                remote_addr: "127.0.0.1".to_string(),
                start: Utc::now(),
                duration: 2_000_000,
                request: RequestData {
                    method: "GET".to_string(),
                    proto: "HTTP/1.1".to_string(),
                    headers: HeaderMap::new().with("Host", "demo.ngrok.app"),
                    uri: "/".to_string(),
                    raw: None,
                },
                response: None,
            },
        }
    }

    pub fn method(mut self, method: &str) -> Self {
        self.record.request.method = method.to_string();
        self
    }

    pub fn path(mut self, uri: &str) -> Self {
        self.record.request.uri = uri.to_string();
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.record.request.headers = HeaderMap::new().with("Host", host);
        self
    }

    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.record.start = start;
        self
    }

    pub fn request_body(mut self, content_type: &str, message: &str) -> Self {
        self.record
            .request
            .headers
            .append("Content-Type", content_type);
        self.record.request.raw = Some(STANDARD.encode(message));
        self
    }

    pub fn status(mut self, code: u16, text: &str) -> Self {
        self.record.response = Some(ResponseData {
            status: format!("{code} {text}"),
            status_code: code,
            proto: "HTTP/1.1".to_string(),
            headers: HeaderMap::new(),
            raw: None,
        });
        self
    }

    /// Requires [`status`](Self::status) first.
    pub fn response_body(mut self, content_type: &str, message: &str) -> Self {
        let response = self
            .record
            .response
            .as_mut()
            .expect("response_body needs a status first");
        response.headers.append("Content-Type", content_type);
        response.raw = Some(STANDARD.encode(message));
        self
    }

    pub fn build(self) -> CapturedRecord {
        self.record
    }
}

pub fn ok(id: &str) -> CapturedRecord {
    RecordBuilder::new(id).status(200, "OK").build()
}

pub fn failed(id: &str, code: u16) -> CapturedRecord {
    RecordBuilder::new(id).status(code, "Error").build()
}

pub fn ids(records: &[CapturedRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}
