//! Schema Registry Collaborator Interface
//!
//! A [`SchemaSource`] answers a schema ID lookup in one of two shapes: the
//! record is already at hand ([`SchemaLookup::Immediate`]) or a fetch is in
//! flight ([`SchemaLookup::Pending`]) and must be awaited by the caller.

use crate::error::FetchError;
use crate::wire::SchemaId;
use dashmap::DashMap;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Schema as handed out by a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRecord {
    pub id: SchemaId,
    /// Avro schema JSON text
    pub schema: String,
    /// Subject version, when the registry reports one
    pub version: Option<i32>,
    pub subject: Option<String>,
    /// Set when the registry answered with a failed fetch
    pub fetch_error: Option<FetchError>,
}

impl SchemaRecord {
    pub fn new(id: SchemaId, schema: impl Into<String>) -> Self {
        Self {
            id,
            schema: schema.into(),
            version: None,
            subject: None,
            fetch_error: None,
        }
    }

    /// A record that only reports a failed fetch.
    pub fn failed(id: SchemaId, error: FetchError) -> Self {
        Self {
            id,
            schema: String::new(),
            version: None,
            subject: None,
            fetch_error: Some(error),
        }
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Turn a record carrying a fetch error into that error.
    pub fn into_result(self) -> Result<SchemaRecord, FetchError> {
        match self.fetch_error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// Handle to an in-flight schema fetch
pub struct PendingSchema {
    fetch: BoxFuture<'static, Result<SchemaRecord, FetchError>>,
}

impl PendingSchema {
    pub fn new<F>(fetch: F) -> Self
    where
        F: Future<Output = Result<SchemaRecord, FetchError>> + Send + 'static,
    {
        Self {
            fetch: Box::pin(fetch),
        }
    }

    /// Wait for the fetch to complete.
    pub async fn wait(self) -> Result<SchemaRecord, FetchError> {
        self.fetch.await
    }
}

impl fmt::Debug for PendingSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSchema").finish_non_exhaustive()
    }
}

/// Answer to a schema lookup
#[derive(Debug)]
pub enum SchemaLookup {
    /// The registry already holds the answer
    Immediate(SchemaRecord),
    /// A fetch was started and has to be awaited
    Pending(PendingSchema),
}

/// Registry collaborator consulted by the resolver.
pub trait SchemaSource: Send + Sync {
    /// Start a lookup for `id`.
    fn fetch_schema_by_id(&self, id: SchemaId) -> SchemaLookup;
}

/// In-memory schema source
///
/// Answers immediately by default. A deferred source answers every lookup
/// with a pending handle instead, which is how a remote registry behaves.
#[derive(Debug, Default)]
pub struct MemorySchemaSource {
    schemas: DashMap<SchemaId, SchemaRecord>,
    deferred: bool,
    lookups: AtomicUsize,
}

impl MemorySchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose lookups always come back as [`SchemaLookup::Pending`].
    pub fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }

    /// Register (or replace) the schema text for `id`.
    pub fn register(&self, id: SchemaId, schema: impl Into<String>) {
        self.schemas.insert(id, SchemaRecord::new(id, schema));
    }

    /// Register a full record, including a failed one.
    pub fn insert_record(&self, record: SchemaRecord) {
        self.schemas.insert(record.id, record);
    }

    pub fn remove(&self, id: SchemaId) -> Option<SchemaRecord> {
        self.schemas.remove(&id).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Number of lookups answered so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    fn lookup(&self, id: SchemaId) -> SchemaRecord {
        self.schemas
            .get(&id)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| SchemaRecord::failed(id, FetchError::NotFound(id)))
    }
}

impl SchemaSource for MemorySchemaSource {
    fn fetch_schema_by_id(&self, id: SchemaId) -> SchemaLookup {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let record = self.lookup(id);

        if self.deferred {
            SchemaLookup::Pending(PendingSchema::new(async move {
                tokio::task::yield_now().await;
                record.into_result()
            }))
        } else {
            SchemaLookup::Immediate(record)
        }
    }
}
