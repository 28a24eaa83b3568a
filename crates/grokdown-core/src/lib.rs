//! Filtering, tailing and markdown rendering for traffic captured by the
//! ngrok inspector.
//!
//! The crate knows nothing about HTTP transport. Records come in through the
//! [`RecordSource`] trait and leave as markdown strings.
//!
//! # Pipeline
//!
//! ```text
//! RecordSource ──► FilterSpec / Tail ──► decode ──► render ──► markdown
//! ```
//!
//! # Example
//!
//! ```no_run
//! use grokdown_core::{format_records, FilterSpec, FormatOptions, RecordSource, StatusFilter};
//!
//! async fn errors_as_markdown(source: &impl RecordSource) -> Result<String, grokdown_core::SourceError> {
//!     let spec = FilterSpec {
//!         status: Some(StatusFilter::errors()),
//!         limit: Some(20),
//!         ..Default::default()
//!     };
//!     let records = spec.compile().apply(source.fetch_all(None).await?);
//!     Ok(format_records(&records, &FormatOptions::default(), spec.summary().as_deref()))
//! }
//! ```

pub mod decode;
pub mod error;
pub mod filter;
pub mod markdown;
pub mod model;
pub mod render;
pub mod source;
pub mod tail;

pub use error::{FilterError, SourceError};
pub use filter::{
    CompiledFilter, FilterSpec, PathMatcher, StatusClass, StatusFilter, TimeUnit, TimeWindow,
};
pub use markdown::{banner, format_record, format_records, record_label, FormatOptions};
pub use model::{CapturedRecord, CapturedRecordList, HeaderMap, RequestData, ResponseData};
pub use render::{render_body, RenderOptions, RenderedBody};
pub use source::RecordSource;
pub use tail::{Tail, DEFAULT_POLL_INTERVAL};
