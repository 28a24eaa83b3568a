//! Captured request/response records as returned by the inspector API.

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered HTTP headers: name to the list of values seen for it.
///
/// Lookups are case-insensitive. Iteration follows the order the inspector
/// reported the headers in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, creating the header if it is not present yet.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Builder-style [`append`](Self::append).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// All values for a header, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// First value for a header, matched case-insensitively.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for HeaderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

struct HeaderMapVisitor;

impl<'de> Visitor<'de> for HeaderMapVisitor {
    type Value = HeaderMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of header names to lists of values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<HeaderMap, A::Error> {
        let mut headers = HeaderMap::new();
        while let Some((name, values)) = access.next_entry::<String, Vec<String>>()? {
            for value in values {
                headers.append(name.clone(), value);
            }
        }
        Ok(headers)
    }
}

impl<'de> Deserialize<'de> for HeaderMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HeaderMapVisitor)
    }
}

/// Incoming side of a captured exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestData {
    pub method: String,
    pub proto: String,
    #[serde(default)]
    pub headers: HeaderMap,
    pub uri: String,
    /// Base64 encoded raw HTTP message; `None` or empty means nothing captured.
    #[serde(default)]
    pub raw: Option<String>,
}

/// Outgoing side of a captured exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    /// Status line text, e.g. "404 Not Found".
    pub status: String,
    pub status_code: u16,
    pub proto: String,
    #[serde(default)]
    pub headers: HeaderMap,
    #[serde(default)]
    pub raw: Option<String>,
}

/// One request/response pair observed by the inspector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedRecord {
    pub uri: String,
    pub id: String,
    pub tunnel_name: String,
    pub remote_addr: String,
    pub start: DateTime<Utc>,
    /// Elapsed time in nanoseconds.
    pub duration: u64,
    pub request: RequestData,
    /// `None` while the inspector has not seen a response yet.
    #[serde(default)]
    pub response: Option<ResponseData>,
}

impl CapturedRecord {
    /// Status code of the response, if one was captured.
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status_code)
    }

    /// First `Host` header value of the request.
    pub fn host(&self) -> Option<&str> {
        self.request.headers.first("Host")
    }
}

/// Body of `GET /api/requests/http`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedRecordList {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub requests: Vec<CapturedRecord>,
}
