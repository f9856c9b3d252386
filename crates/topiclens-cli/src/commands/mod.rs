//! Command handlers for topiclens

pub mod config;
pub mod decode;
pub mod inspect;

pub use config::ConfigCommands;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::ValueEnum;
use std::io::Read;
use std::path::{Path, PathBuf};

/// How the payload bytes are stored in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputEncoding {
    /// Bytes are used as-is
    Raw,
    /// Standard base64 text (surrounding whitespace is ignored)
    Base64,
}

/// Read a payload from `file`, or stdin when absent or "-"
pub fn read_payload(file: Option<&Path>, encoding: InputEncoding) -> Result<Vec<u8>> {
    let bytes = match file {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("Failed to read payload from {}", path.display()))?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read payload from stdin")?;
            buf
        }
    };

    decode_input(bytes, encoding)
}

fn decode_input(bytes: Vec<u8>, encoding: InputEncoding) -> Result<Vec<u8>> {
    match encoding {
        InputEncoding::Raw => Ok(bytes),
        InputEncoding::Base64 => {
            let text = String::from_utf8(bytes).context("Base64 input is not valid UTF-8")?;
            STANDARD
                .decode(text.trim())
                .context("Invalid base64 payload")
        }
    }
}

/// Parse an `ID=PATH` schema override
pub fn parse_schema_override(spec: &str) -> Result<(i32, PathBuf)> {
    let (id, path) = spec
        .split_once('=')
        .with_context(|| format!("Expected ID=PATH, got '{}'", spec))?;

    let id: i32 = id
        .trim()
        .parse()
        .with_context(|| format!("Invalid schema id '{}'", id))?;

    if path.trim().is_empty() {
        anyhow::bail!("Missing schema file path for id {}", id);
    }

    Ok((id, PathBuf::from(path.trim())))
}
