//! Record filtering.
//!
//! A [`FilterSpec`] is the declarative description built from user input.
//! [`FilterSpec::compile`] resolves it into a [`CompiledFilter`] that is then
//! evaluated against snapshots of captured records.
//!
//! ## Module Structure
//!
//! - `status`: status code and bucket predicate
//! - `path`: glob/regex/literal path matching
//! - `window`: relative time windows

mod path;
mod status;
mod window;

pub use path::{uri_path, PathMatcher};
pub use status::{StatusClass, StatusFilter};
pub use window::{TimeUnit, TimeWindow};

use crate::model::CapturedRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// User-facing filter description. Every predicate is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Maximum number of results, applied after every other predicate.
    pub limit: Option<usize>,
    pub status: Option<StatusFilter>,
    pub path_pattern: Option<String>,
    /// Case-insensitive substring of the Host header.
    pub domain: Option<String>,
    pub time_window: Option<TimeWindow>,
    /// Resolved by the record source, not evaluated here.
    pub tunnel_name: Option<String>,
}

impl FilterSpec {
    pub fn compile(&self) -> CompiledFilter {
        CompiledFilter {
            status: self.status.clone(),
            path: self.path_pattern.as_deref().map(PathMatcher::compile),
            domain: self.domain.as_ref().map(|d| d.to_lowercase()),
            time_window: self.time_window,
            limit: self.limit,
        }
    }

    /// Human readable description of the active filters, e.g.
    /// `errors only, path=/api/*, since=5m`.
    pub fn summary(&self) -> Option<String> {
        let mut parts = Vec::new();

        if let Some(status) = &self.status {
            if status.errors_only {
                parts.push("errors only".to_string());
            }
            if !status.exact.is_empty() {
                let codes: Vec<String> = status.exact.iter().map(u16::to_string).collect();
                parts.push(format!("status={}", codes.join(",")));
            }
            if !status.ranges.is_empty() {
                let ranges: Vec<String> = status.ranges.iter().map(ToString::to_string).collect();
                parts.push(format!("status={}", ranges.join(",")));
            }
        }
        if let Some(path) = &self.path_pattern {
            parts.push(format!("path={path}"));
        }
        if let Some(domain) = &self.domain {
            parts.push(format!("domain={domain}"));
        }
        if let Some(tunnel) = &self.tunnel_name {
            parts.push(format!("tunnel={tunnel}"));
        }
        if let Some(window) = &self.time_window {
            parts.push(format!("since={window}"));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// A [`FilterSpec`] with its path pattern resolved and domain normalised.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    status: Option<StatusFilter>,
    path: Option<PathMatcher>,
    domain: Option<String>,
    time_window: Option<TimeWindow>,
    limit: Option<usize>,
}

impl CompiledFilter {
    /// Filter with the current time, then apply the limit.
    pub fn apply(&self, records: Vec<CapturedRecord>) -> Vec<CapturedRecord> {
        self.apply_at(records, Utc::now())
    }

    /// Filter against a fixed `now`, then apply the limit.
    pub fn apply_at(&self, records: Vec<CapturedRecord>, now: DateTime<Utc>) -> Vec<CapturedRecord> {
        let mut matched = self.retain_matching(records, now);
        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }

    /// Every predicate except the limit, preserving order.
    pub fn retain_matching(
        &self,
        mut records: Vec<CapturedRecord>,
        now: DateTime<Utc>,
    ) -> Vec<CapturedRecord> {
        if let Some(status) = &self.status {
            let before = records.len();
            records.retain(|r| r.status_code().is_some_and(|code| status.matches(code)));
            log_reduction("status", before, records.len());
        }

        if let Some(path) = &self.path {
            let before = records.len();
            records.retain(|r| path.matches_uri(&r.request.uri));
            log_reduction("path", before, records.len());
        }

        if let Some(domain) = &self.domain {
            let before = records.len();
            records.retain(|r| host_contains(r, domain));
            log_reduction("domain", before, records.len());
        }

        if let Some(window) = &self.time_window {
            let before = records.len();
            let cutoff = window.cutoff(now);
            records.retain(|r| r.start >= cutoff);
            log_reduction("time_window", before, records.len());
        }

        records
    }

    /// Whether a single record passes every predicate except the limit.
    pub fn matches(&self, record: &CapturedRecord, now: DateTime<Utc>) -> bool {
        if let Some(status) = &self.status {
            if !record.status_code().is_some_and(|code| status.matches(code)) {
                return false;
            }
        }
        if let Some(path) = &self.path {
            if !path.matches_uri(&record.request.uri) {
                return false;
            }
        }
        if let Some(domain) = &self.domain {
            if !host_contains(record, domain) {
                return false;
            }
        }
        if let Some(window) = &self.time_window {
            if record.start < window.cutoff(now) {
                return false;
            }
        }
        true
    }
}

fn host_contains(record: &CapturedRecord, domain_lower: &str) -> bool {
    record
        .host()
        .is_some_and(|host| host.to_lowercase().contains(domain_lower))
}

fn log_reduction(name: &str, before: usize, after: usize) {
    if before != after {
        debug!("filter: {} filter reduced {} -> {}", name, before, after);
    }
}
