//! grokdown - ngrok inspector traffic as markdown
//!
//! This crate wires the filtering and rendering pipeline of `grokdown-core`
//! to the inspector's HTTP API and exposes it as a command line tool.
//!
//! # Features
//!
//! - **List**: snapshot of captured requests, filtered by status, path, domain, tunnel and age
//! - **Tail**: poll for new requests and print each one as it arrives
//! - **Get**: a single request by id
//!
//! # Example
//!
//! ```no_run
//! use grokdown::api::InspectorClient;
//! use grokdown::commands::list_markdown;
//! use grokdown_core::{FilterSpec, FormatOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = InspectorClient::new("http://127.0.0.1:4040")?;
//!     let spec = FilterSpec { limit: Some(10), ..Default::default() };
//!     if let Some(markdown) = list_markdown(&client, &spec, &FormatOptions::default()).await? {
//!         println!("{markdown}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod help;
pub mod logging;

pub use api::{InspectorClient, DEFAULT_BASE_URL};
pub use cli::Cli;
