//! HTTP client for Schema Registry
//!
//! Looks schemas up by ID through the Confluent-compatible REST API
//! (`GET /schemas/ids/{id}`). As a [`SchemaSource`] every lookup is handed
//! back as a pending fetch.

use crate::error::FetchError;
use crate::registry::{PendingSchema, SchemaLookup, SchemaRecord, SchemaSource};
use crate::wire::SchemaId;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for [`SchemaRegistryClient`]
#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    /// Base URL of schema registry (e.g., "http://localhost:8081")
    pub base_url: String,
    /// Per-request timeout (default: 10s)
    pub request_timeout: Duration,
    /// Optional basic auth credentials (username, password)
    pub basic_auth: Option<(String, String)>,
}

impl RegistryClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(10),
            basic_auth: None,
        }
    }
}

/// Schema lookup response
#[derive(Debug, Deserialize)]
struct SchemaByIdResponse {
    schema: String,

    #[serde(rename = "schemaType", default)]
    schema_type: Option<String>,

    #[serde(default)]
    subject: Option<String>,

    #[serde(default)]
    version: Option<i32>,
}

/// HTTP client for Schema Registry lookups
#[derive(Debug, Clone)]
pub struct SchemaRegistryClient {
    base_url: String,
    basic_auth: Option<(String, String)>,
    http_client: reqwest::Client,
}

impl SchemaRegistryClient {
    /// Create a client with default settings for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_config(RegistryClientConfig::new(base_url))
    }

    pub fn with_config(config: RegistryClientConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            basic_auth: config.basic_auth,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get schema by ID
    pub async fn get_schema_by_id(&self, id: SchemaId) -> Result<SchemaRecord, FetchError> {
        let url = format!("{}/schemas/ids/{}", self.base_url, id);

        let mut request = self.http_client.get(&url);
        if let Some((username, password)) = &self.basic_auth {
            request = request.basic_auth(username, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: SchemaByIdResponse = response
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

        if let Some(schema_type) = body.schema_type.as_deref() {
            if !schema_type.eq_ignore_ascii_case("AVRO") {
                return Err(FetchError::InvalidResponse(format!(
                    "schema {} has type {}, expected AVRO",
                    id, schema_type
                )));
            }
        }

        tracing::debug!(
            schema_id = id,
            subject = ?body.subject,
            version = ?body.version,
            "Schema retrieved successfully"
        );

        Ok(SchemaRecord {
            id,
            schema: body.schema,
            version: body.version,
            subject: body.subject,
            fetch_error: None,
        })
    }
}

impl SchemaSource for SchemaRegistryClient {
    fn fetch_schema_by_id(&self, id: SchemaId) -> SchemaLookup {
        let client = self.clone();
        SchemaLookup::Pending(PendingSchema::new(async move {
            client.get_schema_by_id(id).await
        }))
    }
}
