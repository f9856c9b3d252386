//! topiclens Payload Deserializer
//!
//! Turns arbitrary topic payloads into something a terminal can show. Payloads
//! in the Confluent Avro wire format are decoded to JSON using the schema the
//! registry holds for their embedded ID; everything else passes through as text.
//!
//! # Features
//!
//! - **Wire format**: magic byte + big-endian schema ID detection
//! - **Resolution**: immediate or pending registry answers, optional fetch timeout
//! - **Caching**: opt-in schema cache with TTL and single-flight misses
//! - **Decoding**: `apache_avro` datum decoding with deterministic JSON output
//! - **Registry client**: HTTP client for Confluent-compatible registries
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use topiclens_deserializer::{Deserializer, SchemaRegistryClient};
//!
//! let registry = Arc::new(SchemaRegistryClient::new("http://localhost:8081")?);
//! let deserializer = Deserializer::builder()
//!     .schema_source(registry)
//!     .fetch_timeout(Duration::from_secs(5))
//!     .build();
//!
//! let decoded = deserializer.deserialize(&payload).await?;
//! println!("{}", decoded.value);
//! ```

pub mod cache;
pub mod decoder;
pub mod deserializer;
pub mod error;
pub mod http;
pub mod registry;
pub mod resolver;
pub mod wire;

pub use cache::{CacheConfig, CachingResolver};
pub use decoder::AvroDecoder;
pub use deserializer::{DecodedResult, Deserializer, DeserializerBuilder};
pub use error::{DeserializeError, FetchError, Result};
pub use http::{RegistryClientConfig, SchemaRegistryClient};
pub use registry::{MemorySchemaSource, PendingSchema, SchemaLookup, SchemaRecord, SchemaSource};
pub use resolver::{ResolveSchema, SchemaResolver};
pub use wire::SchemaId;
