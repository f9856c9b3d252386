//! Schema Cache
//!
//! Optional wrapper around any [`ResolveSchema`] that keeps successfully
//! resolved schemas in memory. Failed lookups are never cached.

use crate::error::FetchError;
use crate::registry::SchemaRecord;
use crate::resolver::ResolveSchema;
use crate::wire::SchemaId;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// Cache sizing and expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of schemas kept (default: 1,000)
    pub max_capacity: u64,
    /// Time a schema stays cached after insertion (default: 1 hour)
    pub time_to_live: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            time_to_live: Some(Duration::from_secs(3600)),
        }
    }
}

/// Caching resolver
///
/// Concurrent misses for the same ID share a single lookup on the wrapped
/// resolver.
pub struct CachingResolver<R> {
    inner: R,
    schemas: Cache<SchemaId, SchemaRecord>,
}

impl<R: ResolveSchema> CachingResolver<R> {
    pub fn new(inner: R, config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if let Some(ttl) = config.time_to_live {
            builder = builder.time_to_live(ttl);
        }

        Self {
            inner,
            schemas: builder.build(),
        }
    }

    /// Drop the cached schema for `id`.
    pub async fn invalidate(&self, id: SchemaId) {
        self.schemas.invalidate(&id).await;
    }

    pub fn invalidate_all(&self) {
        self.schemas.invalidate_all();
    }

    /// Number of cached schemas, after pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.schemas.run_pending_tasks().await;
        self.schemas.entry_count()
    }
}

#[async_trait]
impl<R: ResolveSchema> ResolveSchema for CachingResolver<R> {
    async fn resolve(&self, id: SchemaId) -> Result<SchemaRecord, FetchError> {
        self.schemas
            .try_get_with(id, async {
                debug!(schema_id = id, "Schema cache miss");
                self.inner.resolve(id).await
            })
            .await
            .map_err(|e| (*e).clone())
    }
}
