//! Decode command
//!
//! Reads one payload, runs it through the deserializer and prints the result.

use super::{parse_schema_override, read_payload, InputEncoding};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use topiclens_deserializer::{
    Deserializer, MemorySchemaSource, SchemaRegistryClient, SchemaSource,
};

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Payload file ("-" or omitted reads stdin)
    pub file: Option<PathBuf>,

    /// Input encoding
    #[arg(short, long, value_enum, default_value = "raw")]
    pub encoding: InputEncoding,

    /// Print the schema used for decoding
    #[arg(long)]
    pub show_schema: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Use a local schema file for an ID instead of the registry (repeatable)
    #[arg(long = "schema", value_name = "ID=PATH")]
    pub schemas: Vec<String>,
}

/// Build a deserializer from config and local schema overrides.
///
/// Local schema files replace the registry entirely.
pub fn build_deserializer(config: &Config, overrides: &[String]) -> Result<Deserializer> {
    let source: Option<Arc<dyn SchemaSource>> = if !overrides.is_empty() {
        let memory = MemorySchemaSource::new();
        for spec in overrides {
            let (id, path) = parse_schema_override(spec)?;
            let schema = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read schema file {}", path.display()))?;
            memory.register(id, schema);
        }
        Some(Arc::new(memory))
    } else if let Some(client_config) = config.registry_client_config() {
        let client = SchemaRegistryClient::with_config(client_config)
            .context("Failed to create schema registry client")?;
        Some(Arc::new(client))
    } else {
        None
    };

    let Some(source) = source else {
        return Ok(Deserializer::without_registry());
    };

    let mut builder = Deserializer::builder().schema_source(source);
    if let Some(timeout) = config.fetch_timeout() {
        builder = builder.fetch_timeout(timeout);
    }
    if config.cache.enabled {
        builder = builder.cache(config.cache.to_cache_config());
    }
    Ok(builder.build())
}

pub async fn handle_decode(args: DecodeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let payload = read_payload(args.file.as_deref(), args.encoding)?;
    let deserializer = build_deserializer(config, &args.schemas)?;

    tracing::debug!(
        payload_len = payload.len(),
        has_registry = deserializer.has_registry(),
        "Decoding payload"
    );

    let result = deserializer.deserialize(&payload).await?;
    formatter.print_decoded(&result, args.show_schema);

    Ok(())
}
