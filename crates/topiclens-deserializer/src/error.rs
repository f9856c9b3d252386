//! Deserialization Error Types

use crate::wire::SchemaId;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeserializeError>;

/// Errors returned by [`Deserializer::deserialize`](crate::Deserializer::deserialize).
///
/// Registry failures carry the "avro deserialization failed" context. Schema
/// compile and payload decode failures keep the codec's message verbatim.
/// Each variant prints its cause once, so `{:#}` chains never repeat a line.
#[derive(Error, Debug)]
pub enum DeserializeError {
    /// Avro-framed input was seen but no schema registry was configured.
    #[error("avro deserialization failed: no schema registry configured")]
    NoRegistryConfigured,

    /// The registry lookup for the embedded schema ID failed.
    #[error("avro deserialization failed: {0}")]
    SchemaFetchFailed(FetchError),

    /// The schema text is not a valid Avro schema. Holds the innermost parser
    /// complaint, e.g. the JSON syntax error for text that is not JSON.
    #[error("{0}")]
    SchemaCompile(String),

    /// The binary payload does not match the compiled schema.
    #[error(transparent)]
    PayloadDecode(Box<apache_avro::Error>),

    /// The decoded value has no JSON representation.
    #[error("cannot encode decoded value as JSON: {0}")]
    JsonEncode(String),
}

impl DeserializeError {
    /// Compile error carrying the deepest cause of a schema parse failure.
    pub(crate) fn schema_compile(err: apache_avro::Error) -> Self {
        let mut cause: &(dyn std::error::Error + 'static) = &err;
        while let Some(next) = std::error::Error::source(cause) {
            cause = next;
        }
        DeserializeError::SchemaCompile(cause.to_string())
    }

    /// True for failures raised while compiling the schema or decoding the body.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            DeserializeError::SchemaCompile(_)
                | DeserializeError::PayloadDecode(_)
                | DeserializeError::JsonEncode(_)
        )
    }

    /// True for failures raised before the codec ran.
    pub fn is_registry_error(&self) -> bool {
        matches!(
            self,
            DeserializeError::NoRegistryConfigured | DeserializeError::SchemaFetchFailed(_)
        )
    }
}

/// Schema registry lookup failures.
///
/// `Clone` so a failure can travel inside a [`SchemaRecord`](crate::SchemaRecord)
/// and be handed out by the caching resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("schema {0} not found")]
    NotFound(SchemaId),

    #[error("schema lookup failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to fetch schema: {0}")]
    Transport(String),

    #[error("failed to parse schema response: {0}")]
    InvalidResponse(String),

    #[error("schema fetch timed out after {0:?}")]
    Timeout(Duration),
}
