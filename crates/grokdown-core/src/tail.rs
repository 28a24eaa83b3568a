//! Continuous tailing of a record source.
//!
//! A [`Tail`] remembers every record id present when it started and yields
//! only records that appear afterwards and pass the filter, in the order the
//! source reports them.

use crate::error::SourceError;
use crate::filter::{CompiledFilter, FilterSpec};
use crate::model::CapturedRecord;
use crate::source::RecordSource;
use chrono::Utc;
use futures::Stream;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tracing::debug;

/// Delay between two polls of the source.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Poll-based tail over a [`RecordSource`].
///
/// The seen set is never pruned, so it grows with the number of distinct
/// records observed during the session.
pub struct Tail<S> {
    source: S,
    filter: CompiledFilter,
    tunnel_name: Option<String>,
    interval: Duration,
    seen: HashSet<String>,
    pending: VecDeque<CapturedRecord>,
}

impl<S: RecordSource> Tail<S> {
    /// Fetch the current snapshot and mark all of it as already seen.
    ///
    /// The limit of `spec` is ignored; the tunnel name is passed to the
    /// source as a pre-filter.
    pub async fn start(source: S, spec: &FilterSpec, interval: Duration) -> Result<Self, SourceError> {
        let tunnel_name = spec.tunnel_name.clone();
        let initial = source.fetch_all(tunnel_name.as_deref()).await?;
        let seen: HashSet<String> = initial.into_iter().map(|r| r.id).collect();
        debug!("tail: initialized with {} existing requests", seen.len());

        Ok(Self {
            source,
            filter: spec.compile(),
            tunnel_name,
            interval,
            seen,
            pending: VecDeque::new(),
        })
    }

    /// Wait for the next new matching record.
    ///
    /// Only returns on a new record or a fetch failure.
    pub async fn next(&mut self) -> Result<CapturedRecord, SourceError> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Ok(record);
            }
            tokio::time::sleep(self.interval).await;
            self.poll().await?;
        }
    }

    /// Number of distinct ids seen so far, including the initial snapshot.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Convert into a stream that ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<CapturedRecord, SourceError>> {
        futures::stream::unfold(Some(self), |state| async move {
            let mut tail = state?;
            match tail.next().await {
                Ok(record) => Some((Ok(record), Some(tail))),
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    async fn poll(&mut self) -> Result<(), SourceError> {
        let snapshot = self.source.fetch_all(self.tunnel_name.as_deref()).await?;
        let fresh: Vec<CapturedRecord> = snapshot
            .into_iter()
            .filter(|r| !self.seen.contains(&r.id))
            .collect();

        if !fresh.is_empty() {
            debug!("tail: found {} new request(s) in poll", fresh.len());
        }

        for record in self.filter.retain_matching(fresh, Utc::now()) {
            // The same id may appear twice within one snapshot.
            if !self.seen.insert(record.id.clone()) {
                continue;
            }
            debug!(
                "tail: queueing {} - has_response={}, has_raw_body={}, raw_len={}",
                record.id,
                record.response.is_some(),
                record.response.as_ref().is_some_and(|r| r.raw.is_some()),
                record
                    .response
                    .as_ref()
                    .and_then(|r| r.raw.as_ref())
                    .map_or(0, String::len),
            );
            self.pending.push_back(record);
        }

        Ok(())
    }
}
