//! Decoding of captured raw HTTP messages.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

/// Decode a base64 payload into text, replacing invalid UTF-8.
///
/// Absent, empty and malformed payloads all yield an empty string.
pub fn decode_payload(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return String::new();
    };

    match STANDARD.decode(raw) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            debug!("Failed to decode base64 payload ({} chars): {}", raw.len(), e);
            String::new()
        }
    }
}

/// Body part of a raw HTTP message.
///
/// Splits at the first `\r\n\r\n`, or failing that the first `\n\n`. Input
/// without a separator is returned unchanged.
pub fn extract_body(message: &str) -> &str {
    if let Some(idx) = message.find("\r\n\r\n") {
        return &message[idx + 4..];
    }
    if let Some(idx) = message.find("\n\n") {
        return &message[idx + 2..];
    }
    message
}

/// Decode a payload and strip its header block.
pub fn decode_body(raw: Option<&str>) -> String {
    let message = decode_payload(raw);
    extract_body(&message).to_string()
}
