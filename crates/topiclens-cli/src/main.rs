//! topiclens CLI
//!
//! Decodes topic payloads for the terminal. Payloads framed in the Confluent
//! Avro wire format are decoded through the schema registry; anything else is
//! printed as text.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point at a schema registry
//! export SCHEMA_REGISTRY_URL=http://localhost:8081
//!
//! # Decode a payload dumped to a file
//! topiclens decode message.bin --pretty --show-schema
//!
//! # Decode base64 from stdin with a local schema
//! echo AAAAAAEISm9objQ= | topiclens decode -e base64 --schema 1=person.avsc
//!
//! # Look at the framing only
//! topiclens inspect message.bin
//! ```
//!
//! ## Configuration
//!
//! Settings are read from `~/.topiclens/config.toml` (see `topiclens config
//! init`); flags and environment variables take precedence:
//! - `SCHEMA_REGISTRY_URL`: registry base URL
//! - `TOPICLENS_CONFIG`: alternative config file
//! - `RUST_LOG`: log filter (default: warn)

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod format;

use config::{Config, OutputFormat};
use format::Formatter;

#[derive(Parser)]
#[command(name = "topiclens")]
#[command(about = "Decode Avro and plain topic payloads", long_about = None)]
struct Cli {
    /// Schema Registry URL (REST)
    #[arg(long, env = "SCHEMA_REGISTRY_URL")]
    registry_url: Option<String>,

    /// Upper bound on a schema fetch, in seconds
    #[arg(long)]
    fetch_timeout: Option<u64>,

    /// Cache resolved schemas for the lifetime of the process
    #[arg(long)]
    cache: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Config file path
    #[arg(long = "config", env = "TOPICLENS_CONFIG")]
    config_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a payload
    Decode(commands::decode::DecodeArgs),
    /// Show the wire-format framing of a payload
    Inspect(commands::inspect::InspectArgs),
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: commands::ConfigCommands,
    },
}

impl Cli {
    /// Apply flag and environment overrides on top of the file config
    fn effective_config(&self, mut config: Config) -> Config {
        if let Some(url) = &self.registry_url {
            config.schema_registry_url = Some(url.clone());
        }
        if let Some(secs) = self.fetch_timeout {
            config.fetch_timeout_secs = Some(secs);
        }
        if self.cache {
            config.cache.enabled = true;
        }
        if self.no_color {
            config.colored = false;
        }
        if let Commands::Decode(args) = &self.command {
            if args.pretty {
                config.output_format = OutputFormat::Pretty;
            }
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let file_config = Config::load(cli.config_path.as_deref())?;
    let config = cli.effective_config(file_config);
    let formatter = Formatter::new(config.output_format, config.colored);

    let outcome = match cli.command {
        Commands::Decode(args) => commands::decode::handle_decode(args, &config, &formatter).await,
        Commands::Inspect(args) => commands::inspect::handle_inspect(args, &formatter),
        Commands::Config { command } => {
            commands::config::handle_config_command(command, &config, cli.config_path.as_deref())
        }
    };

    if let Err(e) = outcome {
        formatter.print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
