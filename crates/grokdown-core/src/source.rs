//! The seam between the core and whatever serves captured records.

use crate::error::SourceError;
use crate::model::CapturedRecord;
use async_trait::async_trait;
use std::sync::Arc;

/// A provider of captured records, typically the inspector HTTP API.
///
/// Transport failures must come back as errors, never as empty results.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the current snapshot, optionally scoped to one tunnel.
    async fn fetch_all(&self, tunnel_name: Option<&str>)
        -> Result<Vec<CapturedRecord>, SourceError>;

    /// Fetch a single record by id.
    async fn fetch_one(&self, id: &str) -> Result<CapturedRecord, SourceError>;
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for &T {
    async fn fetch_all(
        &self,
        tunnel_name: Option<&str>,
    ) -> Result<Vec<CapturedRecord>, SourceError> {
        (**self).fetch_all(tunnel_name).await
    }

    async fn fetch_one(&self, id: &str) -> Result<CapturedRecord, SourceError> {
        (**self).fetch_one(id).await
    }
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    async fn fetch_all(
        &self,
        tunnel_name: Option<&str>,
    ) -> Result<Vec<CapturedRecord>, SourceError> {
        (**self).fetch_all(tunnel_name).await
    }

    async fn fetch_one(&self, id: &str) -> Result<CapturedRecord, SourceError> {
        (**self).fetch_one(id).await
    }
}
