//! Config commands

use crate::config::Config;
use anyhow::Result;
use clap::Subcommand;
use std::path::Path;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config_command(
    command: ConfigCommands,
    effective: &Config,
    path: Option<&Path>,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", toml::to_string_pretty(effective)?);
        }
        ConfigCommands::Init { force } => {
            let target = path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_path);
            if target.exists() && !force {
                anyhow::bail!(
                    "Config file {} already exists (use --force to overwrite)",
                    target.display()
                );
            }
            let written = Config::default().save(Some(&target))?;
            println!("✅ Wrote {}", written.display());
        }
    }

    Ok(())
}
