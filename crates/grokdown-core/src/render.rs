//! Body rendering: chunked/event-stream reconstruction, JSON pretty printing,
//! truncation and code block language selection.

use serde::{Deserialize, Serialize};

/// Options that affect how a body is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub pretty_print: bool,
    /// Maximum number of characters to keep.
    pub truncate: Option<usize>,
}

/// A body ready to be placed in a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    pub text: String,
    /// Code block language tag, empty when unknown.
    pub lang: &'static str,
}

const DATA_PREFIX: &str = "data:";
const DATA_INDENT: &str = "      ";

/// Render a body for display.
pub fn render_body(body: &str, content_type: &str, options: &RenderOptions) -> RenderedBody {
    let mut text = if options.pretty_print && is_chunked(body) {
        reassemble_chunks(body)
    } else if options.pretty_print && content_type.to_lowercase().contains("json") {
        pretty_json(body).unwrap_or_else(|| body.to_string())
    } else {
        body.to_string()
    };

    if let Some(limit) = options.truncate {
        if text.chars().count() > limit {
            let total = body.chars().count();
            text = text.chars().take(limit).collect();
            text.push_str(&format!("\n... (truncated, {total} total chars)"));
        }
    }

    RenderedBody {
        text,
        lang: code_block_lang(content_type),
    }
}

/// Code block language for a content type; first match wins.
pub fn code_block_lang(content_type: &str) -> &'static str {
    let ct = content_type.to_lowercase();
    ["json", "xml", "html", "javascript", "css"]
        .into_iter()
        .find(|lang| ct.contains(lang))
        .unwrap_or("")
}

/// Heuristic check for chunked transfer framing: a hex size on the first line
/// and a terminal `0` chunk.
pub fn is_chunked(body: &str) -> bool {
    let lines: Vec<&str> = body.split('\n').collect();
    if lines.iter().filter(|l| !l.trim().is_empty()).count() < 2 {
        return false;
    }

    let first_is_size = is_hex(lines[0].trim());
    let last_is_zero = lines
        .iter()
        .rev()
        .find(|l| !l.trim().is_empty())
        .is_some_and(|l| l.trim() == "0");

    first_is_size && last_is_zero
}

/// Drop chunk size lines and pretty print JSON carried on `data:` lines.
pub fn reassemble_chunks(body: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    for line in body.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if is_hex(line.trim()) {
            continue;
        }

        match line.strip_prefix(DATA_PREFIX) {
            Some(payload) => out.push(render_data_line(payload.trim())),
            None => out.push(line.to_string()),
        }
    }

    while out.last().is_some_and(|l| l.trim().is_empty()) {
        out.pop();
    }

    out.join("\n")
}

fn render_data_line(payload: &str) -> String {
    match pretty_json(payload) {
        Some(pretty) => {
            let mut lines = pretty.lines();
            let mut rendered = format!("data: {}", lines.next().unwrap_or_default());
            for continuation in lines {
                rendered.push('\n');
                rendered.push_str(DATA_INDENT);
                rendered.push_str(continuation);
            }
            rendered
        }
        None => format!("data: {payload}"),
    }
}

/// Re-serialize JSON with two-space indentation, `None` if it does not parse.
pub fn pretty_json(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}
