//! grokdown - render ngrok inspector traffic as markdown
//!
//! # Usage
//!
//! ```bash
//! # Last 20 requests
//! grokdown list
//!
//! # Watch for server errors on a different inspector port
//! grokdown --base-url http://127.0.0.1:4041 tail --status 5xx
//!
//! # One request, pretty-printed
//! grokdown get 548fb5c700000002 --pretty
//! ```

use clap::Parser;
use grokdown::commands;
use grokdown::Cli;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.debug {
        if let Err(e) = grokdown::logging::init_debug() {
            eprintln!("Warning: debug logging unavailable: {e}");
        }
    }

    match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", commands::describe_error(&e));
            ExitCode::FAILURE
        }
    }
}
