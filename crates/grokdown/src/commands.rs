//! Command runners.
//!
//! Markdown goes to stdout. Diagnostics, empty-result hints and errors go to
//! stderr so the output can be piped straight into another tool.

use crate::api::InspectorClient;
use crate::cli::{Cli, Command, GetArgs, ListArgs, TailArgs};
use crate::help::get_help;
use grokdown_core::{
    banner, format_record, format_records, record_label, CapturedRecord, FilterSpec,
    FormatOptions, RecordSource, SourceError, Tail,
};
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.debug {
        debug!("Debug mode enabled");
    }

    match cli.command {
        Command::Help { command } => {
            println!("{}", get_help(command.as_deref()));
            Ok(ExitCode::SUCCESS)
        }
        Command::List(args) => run_list(&cli.base_url, &args).await,
        Command::Tail(args) => run_tail(&cli.base_url, &args).await,
        Command::Get(args) => run_get(&cli.base_url, &args).await,
    }
}

/// Message printed for a failed command.
///
/// Connection failures carry their own troubleshooting text; everything else
/// gets an `Error:` prefix.
pub fn describe_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<SourceError>() {
        Some(e @ SourceError::Connection { .. }) => e.to_string(),
        _ => format!("Error: {error}"),
    }
}

async fn run_list(base_url: &str, args: &ListArgs) -> anyhow::Result<ExitCode> {
    let spec = args.to_spec()?;
    let options = args.output.to_format_options();
    let client = InspectorClient::new(base_url)?;

    match list_markdown(&client, &spec, &options).await? {
        Some(output) => {
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("{}", no_results_message(&spec, &client.inspect_url()));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_tail(base_url: &str, args: &TailArgs) -> anyhow::Result<ExitCode> {
    let spec = args.to_spec()?;
    let options = args.output.to_format_options();
    let client = InspectorClient::new(base_url)?;
    debug!("Connecting to {}", client.base_url());

    let mut stdout = std::io::stdout();
    writeln!(stdout, "Watching for requests... (Ctrl+C to stop)\n")?;
    stdout.flush()?;

    tokio::select! {
        result = tail_to(&client, &spec, &options, args.interval(), &mut stdout) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("\nStopped watching.");
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_get(base_url: &str, args: &GetArgs) -> anyhow::Result<ExitCode> {
    let options = args.output.to_format_options();
    let client = InspectorClient::new(base_url)?;

    println!("{}", get_markdown(&client, &args.id, &options).await?);
    Ok(ExitCode::SUCCESS)
}

/// Fetch, filter and render a snapshot. `None` when nothing matched.
pub async fn list_markdown<S: RecordSource>(
    source: &S,
    spec: &FilterSpec,
    options: &FormatOptions,
) -> Result<Option<String>, SourceError> {
    let records = source.fetch_all(spec.tunnel_name.as_deref()).await?;
    let records = spec.compile().apply(records);
    debug!("{} requests after filtering", records.len());

    if records.is_empty() {
        return Ok(None);
    }
    Ok(Some(format_records(
        &records,
        options,
        spec.summary().as_deref(),
    )))
}

/// Render a single record by id.
pub async fn get_markdown<S: RecordSource>(
    source: &S,
    id: &str,
    options: &FormatOptions,
) -> Result<String, SourceError> {
    let record = source.fetch_one(id).await?;
    log_record_state(&record);
    Ok(format_record(&record, options))
}

/// Write every new matching record to `out` until the source fails.
pub async fn tail_to<S: RecordSource, W: Write>(
    source: S,
    spec: &FilterSpec,
    options: &FormatOptions,
    interval: Duration,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut tail = Tail::start(source, spec, interval).await?;

    loop {
        let record = tail.next().await?;
        log_record_state(&record);

        writeln!(out, "{}\n", banner(&record_label(&record)))?;
        writeln!(out, "{}", format_record(&record, options))?;
        out.flush()?;
    }
}

/// Hint shown on stderr when a listing comes back empty.
pub fn no_results_message(spec: &FilterSpec, inspect_url: &str) -> String {
    let mut lines = vec!["No requests found matching filters:".to_string()];
    if let Some(summary) = spec.summary() {
        lines.extend(summary.split(", ").map(|part| format!("  • {part}")));
    }
    lines.push(String::new());
    lines.push("Try broadening your filters or check ngrok at:".to_string());
    lines.push(inspect_url.to_string());
    lines.join("\n")
}

fn log_record_state(record: &CapturedRecord) {
    let (id, method, uri) = (&record.id, &record.request.method, &record.request.uri);

    let Some(response) = &record.response else {
        debug!("{id} {method} {uri}: response is None");
        return;
    };

    match response.raw.as_deref() {
        None => debug!("{id} {method} {uri}: response.raw is None"),
        Some("") => debug!("{id} {method} {uri}: response.raw is empty"),
        Some(raw) => debug!(
            "{id} {method} {uri}: status={}, raw_b64_len={}, content-length={}",
            response.status_code,
            raw.len(),
            response.headers.first("Content-Length").unwrap_or("None"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grokdown_core::{StatusFilter, TimeUnit, TimeWindow};

    #[test]
    fn test_no_results_message_lists_filters() {
        let spec = FilterSpec {
            status: Some(StatusFilter::errors()),
            path_pattern: Some("/api/*".to_string()),
            time_window: Some(TimeWindow::new(5, TimeUnit::Minutes)),
            ..Default::default()
        };
        assert_eq!(
            no_results_message(&spec, "http://127.0.0.1:4040/inspect/http"),
            "No requests found matching filters:\n  \
             • errors only\n  \
             • path=/api/*\n  \
             • since=5m\n\n\
             Try broadening your filters or check ngrok at:\n\
             http://127.0.0.1:4040/inspect/http"
        );
    }

    #[test]
    fn test_no_results_message_without_filters() {
        let message = no_results_message(&FilterSpec::default(), "http://x/inspect/http");
        assert!(message.starts_with("No requests found matching filters:\n\nTry"));
    }

    #[test]
    fn test_describe_connection_error() {
        let error = anyhow::Error::new(SourceError::Connection {
            base_url: "http://127.0.0.1:4040".to_string(),
        });
        let text = describe_error(&error);
        assert!(text.starts_with("Cannot connect to ngrok inspector at http://127.0.0.1:4040"));
        assert!(text.ends_with("Start ngrok with: ngrok http <port>"));
    }

    #[test]
    fn test_describe_other_errors() {
        let error = anyhow::Error::new(SourceError::NotFound("abc".to_string()));
        assert_eq!(describe_error(&error), "Error: Request not found: abc");

        let error = anyhow::Error::new(grokdown_core::FilterError::InvalidTimeWindow(
            "5d".to_string(),
        ));
        assert_eq!(
            describe_error(&error),
            "Error: Invalid time window format: 5d. Use format like '5s', '2m', '1h'"
        );
    }
}
