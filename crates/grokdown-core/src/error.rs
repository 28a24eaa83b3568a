//! Error types shared by the filtering, tailing and source layers.

use thiserror::Error;

/// Errors raised by a [`RecordSource`](crate::source::RecordSource).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(
        "Cannot connect to ngrok inspector at {base_url}\n\n\
         Possible causes:\n  \
         • ngrok is not running\n  \
         • ngrok is running on a different port (use --base-url)\n  \
         • The inspector interface is disabled\n\n\
         Start ngrok with: ngrok http <port>"
    )]
    Connection { base_url: String },
    #[error("Request not found: {0}")]
    NotFound(String),
    #[error("Inspector returned error: {message} (status: {status})")]
    Upstream { status: u16, message: String },
    #[error("Failed to parse inspector response: {0}")]
    Parse(String),
}

/// Errors raised while building filters from user input.
///
/// These surface before any fetch happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid time window format: {0}. Use format like '5s', '2m', '1h'")]
    InvalidTimeWindow(String),
    #[error("Invalid status range: {0}. Use 1xx, 2xx, 3xx, 4xx, or 5xx")]
    InvalidStatusRange(String),
    #[error("Status code must be between 100 and 599: {0}")]
    StatusOutOfRange(String),
    #[error("Invalid status filter: {0}. Use a number (404) or range (4xx)")]
    InvalidStatus(String),
}
