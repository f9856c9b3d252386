//! Inspect command
//!
//! Reports whether a payload carries the Confluent Avro framing without
//! contacting a registry.

use super::{read_payload, InputEncoding};
use crate::format::Formatter;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use topiclens_deserializer::wire;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Payload file ("-" or omitted reads stdin)
    pub file: Option<PathBuf>,

    /// Input encoding
    #[arg(short, long, value_enum, default_value = "raw")]
    pub encoding: InputEncoding,
}

/// Summary of a payload's framing
#[derive(Debug, PartialEq, Eq)]
pub struct PayloadSummary {
    pub len: usize,
    pub schema_id: Option<i32>,
    pub body_len: usize,
}

impl PayloadSummary {
    pub fn of(payload: &[u8]) -> Self {
        match wire::split(payload) {
            Some((schema_id, body)) => Self {
                len: payload.len(),
                schema_id: Some(schema_id),
                body_len: body.len(),
            },
            None => Self {
                len: payload.len(),
                schema_id: None,
                body_len: payload.len(),
            },
        }
    }
}

pub fn handle_inspect(args: InspectArgs, formatter: &Formatter) -> Result<()> {
    let payload = read_payload(args.file.as_deref(), args.encoding)?;
    let summary = PayloadSummary::of(&payload);

    match summary.schema_id {
        Some(schema_id) => {
            formatter.print_field("format", "confluent-avro");
            formatter.print_field("schema id", &schema_id.to_string());
            formatter.print_field("avro body", &format!("{} bytes", summary.body_len));
        }
        None => {
            formatter.print_field("format", "raw");
        }
    }
    formatter.print_field("length", &format!("{} bytes", summary.len));

    Ok(())
}
