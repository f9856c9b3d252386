//! Schema Resolution
//!
//! Turns a schema ID into a [`SchemaRecord`] by asking the configured
//! [`SchemaSource`]. Immediate and pending answers end up in the same
//! `Result`; a pending fetch is the only place the pipeline suspends.

use crate::error::FetchError;
use crate::registry::{SchemaLookup, SchemaRecord, SchemaSource};
use crate::wire::SchemaId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can resolve a schema ID to a schema record.
#[async_trait]
pub trait ResolveSchema: Send + Sync {
    async fn resolve(&self, id: SchemaId) -> Result<SchemaRecord, FetchError>;
}

/// Resolver backed directly by a [`SchemaSource`]
///
/// Every call performs a fresh lookup. Failures are returned as reported by
/// the source, without retries.
pub struct SchemaResolver {
    source: Arc<dyn SchemaSource>,
    fetch_timeout: Option<Duration>,
}

impl SchemaResolver {
    pub fn new(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            source,
            fetch_timeout: None,
        }
    }

    /// Bound how long a pending fetch may take.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout
    }

    async fn resolve_inner(&self, id: SchemaId) -> Result<SchemaRecord, FetchError> {
        match self.source.fetch_schema_by_id(id) {
            SchemaLookup::Immediate(record) => {
                debug!(schema_id = id, "Schema answered immediately");
                record.into_result()
            }
            SchemaLookup::Pending(pending) => {
                debug!(schema_id = id, "Waiting for schema fetch");
                let record = match self.fetch_timeout {
                    Some(limit) => tokio::time::timeout(limit, pending.wait())
                        .await
                        .map_err(|_| FetchError::Timeout(limit))??,
                    None => pending.wait().await?,
                };
                record.into_result()
            }
        }
    }
}

#[async_trait]
impl ResolveSchema for SchemaResolver {
    async fn resolve(&self, id: SchemaId) -> Result<SchemaRecord, FetchError> {
        let result = self.resolve_inner(id).await;
        if let Err(e) = &result {
            warn!(schema_id = id, error = %e, "Schema lookup failed");
        }
        result
    }
}
