//! Payload Deserializer
//!
//! Entry point used by the message browser. Each call walks the same linear
//! path and keeps no state between calls:
//!
//! ```text
//! bytes ──► empty? ──yes──► ("", "")
//!             │
//!             ▼
//!       Confluent framed? ──no──► (bytes as text, "")
//!             │
//!             ▼
//!       registry configured? ──no──► NoRegistryConfigured
//!             │
//!             ▼
//!       resolve schema id ──err──► SchemaFetchFailed
//!             │
//!             ▼
//!       compile + decode ──err──► SchemaCompile / PayloadDecode
//!             │
//!             ▼
//!       (json, schema text)
//! ```

use crate::cache::{CacheConfig, CachingResolver};
use crate::decoder::AvroDecoder;
use crate::error::{DeserializeError, Result};
use crate::registry::SchemaSource;
use crate::resolver::{ResolveSchema, SchemaResolver};
use crate::wire;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Output of a single deserialization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedResult {
    /// Decoded payload as JSON, the raw text for non-Avro input, or empty
    pub value: String,
    /// Schema text used for decoding, empty unless the payload was Avro
    pub schema: String,
}

impl DecodedResult {
    /// True when the value was decoded through a schema.
    pub fn is_avro(&self) -> bool {
        !self.schema.is_empty()
    }
}

/// Payload deserializer
///
/// Cheap to share behind an `Arc`; calls are independent of each other.
pub struct Deserializer {
    resolver: Option<Arc<dyn ResolveSchema>>,
}

impl Deserializer {
    pub fn builder() -> DeserializerBuilder {
        DeserializerBuilder::new()
    }

    /// A deserializer with no registry; framed Avro payloads fail.
    pub fn without_registry() -> Self {
        Self { resolver: None }
    }

    pub fn has_registry(&self) -> bool {
        self.resolver.is_some()
    }

    /// Deserialize one payload.
    ///
    /// # Errors
    ///
    /// Non-Avro input never fails. Framed input fails with
    /// [`DeserializeError::NoRegistryConfigured`] when no registry is set,
    /// [`DeserializeError::SchemaFetchFailed`] when the lookup fails, and
    /// [`DeserializeError::SchemaCompile`] / [`DeserializeError::PayloadDecode`]
    /// when the codec rejects the schema or the body.
    pub async fn deserialize(&self, data: &[u8]) -> Result<DecodedResult> {
        if data.is_empty() {
            return Ok(DecodedResult::default());
        }

        let Some((schema_id, body)) = wire::split(data) else {
            return Ok(DecodedResult {
                value: String::from_utf8_lossy(data).into_owned(),
                schema: String::new(),
            });
        };

        let resolver = self
            .resolver
            .as_ref()
            .ok_or(DeserializeError::NoRegistryConfigured)?;

        let record = resolver
            .resolve(schema_id)
            .await
            .map_err(DeserializeError::SchemaFetchFailed)?;

        let decoder = AvroDecoder::compile(&record.schema)?;
        let value = decoder.decode_to_json(body)?;

        debug!(
            schema_id,
            body_len = body.len(),
            "Decoded Avro payload"
        );

        Ok(DecodedResult {
            value,
            schema: record.schema,
        })
    }
}

/// Builder for [`Deserializer`]
#[derive(Default)]
pub struct DeserializerBuilder {
    /// Registry collaborator answering schema lookups.
    source: Option<Arc<dyn SchemaSource>>,

    /// Fully custom resolver; takes precedence over `source`.
    resolver: Option<Arc<dyn ResolveSchema>>,

    /// Bound on a pending schema fetch (default: unbounded).
    fetch_timeout: Option<Duration>,

    /// Schema cache settings (default: no cache).
    cache: Option<CacheConfig>,
}

impl DeserializerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema_source(mut self, source: Arc<dyn SchemaSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn ResolveSchema>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Keep resolved schemas in memory.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = Some(config);
        self
    }

    pub fn build(self) -> Deserializer {
        if let Some(resolver) = self.resolver {
            return Deserializer {
                resolver: Some(resolver),
            };
        }

        let resolver = self.source.map(|source| {
            let mut resolver = SchemaResolver::new(source);
            if let Some(timeout) = self.fetch_timeout {
                resolver = resolver.with_fetch_timeout(timeout);
            }

            match self.cache {
                Some(config) => {
                    Arc::new(CachingResolver::new(resolver, config)) as Arc<dyn ResolveSchema>
                }
                None => Arc::new(resolver) as Arc<dyn ResolveSchema>,
            }
        });

        Deserializer { resolver }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemorySchemaSource;

    #[tokio::test]
    async fn test_empty_input() {
        let deserializer = Deserializer::without_registry();
        let result = deserializer.deserialize(&[]).await.unwrap();
        assert_eq!(result, DecodedResult::default());
        assert!(!result.is_avro());
    }

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let deserializer = Deserializer::without_registry();
        let result = deserializer.deserialize(b"hello").await.unwrap();
        assert_eq!(result.value, "hello");
        assert_eq!(result.schema, "");
    }

    #[tokio::test]
    async fn test_short_framed_prefix_is_text() {
        let deserializer = Deserializer::without_registry();
        let result = deserializer.deserialize(&[0x00, 0x00, 0x01]).await.unwrap();
        assert_eq!(result.value, "\u{0}\u{0}\u{1}");
        assert!(result.schema.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let deserializer = Deserializer::without_registry();
        let result = deserializer.deserialize(&[0xFF, 0xFE, b'a']).await.unwrap();
        assert_eq!(result.value, "\u{FFFD}\u{FFFD}a");
    }

    #[tokio::test]
    async fn test_framed_without_registry() {
        let deserializer = Deserializer::without_registry();
        let err = deserializer
            .deserialize(&[0x00, 0x00, 0x00, 0x00, 0x01, 0x02])
            .await
            .unwrap_err();
        assert!(matches!(err, DeserializeError::NoRegistryConfigured));
        assert!(err.to_string().contains("avro deserialization failed"));
    }

    #[test]
    fn test_builder_without_source_has_no_registry() {
        assert!(!Deserializer::builder().build().has_registry());

        let source = Arc::new(MemorySchemaSource::new());
        let deserializer = Deserializer::builder()
            .schema_source(source)
            .fetch_timeout(Duration::from_secs(1))
            .cache(CacheConfig::default())
            .build();
        assert!(deserializer.has_registry());
    }

    #[tokio::test]
    async fn test_custom_resolver() {
        let source = Arc::new(MemorySchemaSource::new());
        source.register(3, r#"{"type": "string"}"#);
        let resolver = Arc::new(SchemaResolver::new(source.clone()));

        let deserializer = Deserializer::builder().resolver(resolver).build();
        // "hi" as an Avro string behind schema id 3
        let result = deserializer
            .deserialize(&[0x00, 0x00, 0x00, 0x00, 0x03, 0x04, b'h', b'i'])
            .await
            .unwrap();

        assert_eq!(result.value, r#""hi""#);
        assert_eq!(result.schema, r#"{"type": "string"}"#);
        assert_eq!(source.lookup_count(), 1);
    }
}
