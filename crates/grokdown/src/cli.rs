//! Command line definition.

use crate::api::DEFAULT_BASE_URL;
use clap::{Args, Parser, Subcommand};
use grokdown_core::{FilterError, FilterSpec, FormatOptions, StatusFilter, TimeWindow};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "grokdown")]
#[command(
    author,
    version,
    about = "Render ngrok inspector traffic as markdown",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// ngrok inspector URL
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_BASE_URL,
        env = "GROKDOWN_BASE_URL"
    )]
    pub base_url: String,

    /// Log diagnostic output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List captured requests
    List(ListArgs),
    /// Watch for new requests in real-time
    Tail(TailArgs),
    /// Get a specific request by ID
    Get(GetArgs),
    /// Show detailed help and examples
    Help {
        /// Command to describe
        command: Option<String>,
    },
}

/// Predicates shared by `list` and `tail`.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Status code filter (e.g. 404, 4xx, 5xx)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Show only error responses (status >= 400)
    #[arg(short, long)]
    pub errors: bool,

    /// Filter by path pattern (glob or regex)
    #[arg(short, long)]
    pub path: Option<String>,

    /// Filter by domain name
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Filter by tunnel name
    #[arg(short, long)]
    pub tunnel: Option<String>,
}

impl FilterArgs {
    /// Build a filter description, validating status and time window input.
    pub fn to_spec(
        &self,
        limit: Option<usize>,
        since: Option<&str>,
    ) -> Result<FilterSpec, FilterError> {
        let status = match (&self.status, self.errors) {
            (Some(value), errors) => Some(StatusFilter::parse(value, errors)?),
            (None, true) => Some(StatusFilter::errors()),
            (None, false) => None,
        };
        let time_window = since.map(TimeWindow::parse).transpose()?;

        Ok(FilterSpec {
            limit,
            status,
            path_pattern: self.path.clone(),
            domain: self.domain.clone(),
            time_window,
            tunnel_name: self.tunnel.clone(),
        })
    }
}

/// Rendering flags shared by every output command.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputArgs {
    /// Pretty-print JSON bodies
    #[arg(long)]
    pub pretty: bool,

    /// Truncate bodies to N characters
    #[arg(long, value_name = "N")]
    pub truncate: Option<usize>,

    /// Omit request and response headers
    #[arg(long)]
    pub no_headers: bool,

    /// Only show this header (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME")]
    pub headers: Vec<String>,
}

impl OutputArgs {
    pub fn to_format_options(&self) -> FormatOptions {
        FormatOptions {
            pretty_print: self.pretty,
            truncate: self.truncate,
            show_headers: !self.no_headers,
            header_allowlist: if self.headers.is_empty() {
                None
            } else {
                Some(self.headers.clone())
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Number of requests to retrieve
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Time window (e.g. 5s, 2m, 1h)
    #[arg(long)]
    pub since: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl ListArgs {
    pub fn to_spec(&self) -> Result<FilterSpec, FilterError> {
        self.filter.to_spec(Some(self.limit), self.since.as_deref())
    }
}

#[derive(Args, Debug)]
pub struct TailArgs {
    /// Poll interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl TailArgs {
    pub fn to_spec(&self) -> Result<FilterSpec, FilterError> {
        self.filter.to_spec(None, None)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// The request ID to retrieve
    pub id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}
