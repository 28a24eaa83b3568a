//! Markdown output for captured records.

use crate::decode::decode_body;
use crate::model::{CapturedRecord, HeaderMap};
use crate::render::{render_body, RenderOptions};
use chrono::{DateTime, Utc};

/// Headers whose values are never printed.
pub const SENSITIVE_HEADERS: [&str; 4] = ["authorization", "x-api-key", "cookie", "set-cookie"];

/// Replacement shown for sensitive header values.
pub const MASK: &str = "***";

const BANNER_WIDTH: usize = 72;

/// Options controlling the markdown layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub pretty_print: bool,
    /// Maximum characters per body.
    pub truncate: Option<usize>,
    pub show_headers: bool,
    /// When set, only these headers (case-insensitive) are shown.
    pub header_allowlist: Option<Vec<String>>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            pretty_print: false,
            truncate: None,
            show_headers: true,
            header_allowlist: None,
        }
    }
}

impl FormatOptions {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            pretty_print: self.pretty_print,
            truncate: self.truncate,
        }
    }
}

/// Render one record.
pub fn format_record(record: &CapturedRecord, options: &FormatOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    let status = record
        .response
        .as_ref()
        .map_or("No Response", |r| r.status.as_str());

    lines.push(format!("## {} {}", record.request.method, record.request.uri));
    lines.push(format!("**Status:** {status}"));
    lines.push(format!("**Duration:** {}", format_duration(record.duration)));
    lines.push(format!("**Timestamp:** {}", format_timestamp(&record.start)));
    lines.push(format!("**Tunnel:** {}", record.tunnel_name));
    lines.push(format!("**Remote:** {}", record.remote_addr));
    lines.push(String::new());

    if options.show_headers {
        push_headers(&mut lines, "Request Headers", &record.request.headers, options);
    }
    push_body(
        &mut lines,
        "Request Body",
        record.request.raw.as_deref(),
        &record.request.headers,
        options,
    );

    if let Some(response) = &record.response {
        if options.show_headers {
            push_headers(&mut lines, "Response Headers", &response.headers, options);
        }
        push_body(
            &mut lines,
            "Response Body",
            response.raw.as_deref(),
            &response.headers,
            options,
        );
    }

    lines.join("\n")
}

/// Render a collection with a summary header.
pub fn format_records(
    records: &[CapturedRecord],
    options: &FormatOptions,
    filters_summary: Option<&str>,
) -> String {
    format_records_at(records, options, filters_summary, Utc::now())
}

/// [`format_records`] with an explicit retrieval time.
pub fn format_records_at(
    records: &[CapturedRecord],
    options: &FormatOptions,
    filters_summary: Option<&str>,
    retrieved: DateTime<Utc>,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    let count = records.len();
    let plural = if count == 1 { "" } else { "s" };
    lines.push(format!("# ngrok Inspector - {count} request{plural}"));
    lines.push(String::new());

    if let Some(summary) = filters_summary {
        lines.push(format!("**Filters:** {summary}"));
    }
    lines.push(format!("**Retrieved:** {}", format_timestamp(&retrieved)));
    lines.push(String::new());

    for (i, record) in records.iter().enumerate() {
        lines.push(banner(&record_label(record)));
        lines.push(String::new());
        lines.push(format_record(record, options));
        if i + 1 < count {
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// `METHOD uri` label used in banners.
pub fn record_label(record: &CapturedRecord) -> String {
    format!("{} {}", record.request.method, record.request.uri)
}

/// Delimiter line naming a record, padded to a fixed width.
pub fn banner(label: &str) -> String {
    let used = label.chars().count() + 5;
    let fill = BANNER_WIDTH.saturating_sub(used).max(3);
    format!("=== {label} {}", "=".repeat(fill))
}

/// Human readable duration from nanoseconds.
pub fn format_duration(nanos: u64) -> String {
    let ms = nanos as f64 / 1_000_000.0;
    if ms < 1.0 {
        format!("{:.2}µs", nanos as f64 / 1_000.0)
    } else if ms < 1000.0 {
        format!("{ms:.0}ms")
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Header lines in stored order, filtered and masked.
pub fn format_headers(headers: &HeaderMap, allowlist: Option<&[String]>) -> Vec<String> {
    let mut lines = Vec::new();

    for (name, values) in headers.iter() {
        if let Some(allowed) = allowlist {
            if !allowed.iter().any(|a| a.eq_ignore_ascii_case(name)) {
                continue;
            }
        }

        if is_sensitive(name) {
            lines.push(format!("{name}: {MASK}"));
            continue;
        }

        for value in values {
            lines.push(format!("{name}: {value}"));
        }
    }

    lines
}

fn is_sensitive(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|sensitive| sensitive.eq_ignore_ascii_case(name))
}

fn push_headers(lines: &mut Vec<String>, title: &str, headers: &HeaderMap, options: &FormatOptions) {
    lines.push(format!("### {title}"));
    lines.push("```".to_string());
    lines.extend(format_headers(headers, options.header_allowlist.as_deref()));
    lines.push("```".to_string());
    lines.push(String::new());
}

fn push_body(
    lines: &mut Vec<String>,
    title: &str,
    raw: Option<&str>,
    headers: &HeaderMap,
    options: &FormatOptions,
) {
    let body = decode_body(raw);
    if body.is_empty() {
        return;
    }

    let content_type = headers.first("Content-Type").unwrap_or_default();
    let rendered = render_body(&body, content_type, &options.render_options());

    lines.push(format!("### {title}"));
    lines.push(format!("```{}", rendered.lang));
    lines.push(rendered.text);
    lines.push("```".to_string());
    lines.push(String::new());
}
