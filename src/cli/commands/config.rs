//! Config command - show or write the resolved configuration

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use super::super::output::{log_success, write_output};
use super::super::parser::GlobalArgs;
use super::super::utils::resolve_config;

/// Configuration management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Action to perform
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration as TOML
    Show,

    /// Write the resolved configuration to a file
    Init {
        /// Destination
        #[arg(value_name = "FILE", default_value = "spanguard.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub fn run(args: ConfigArgs, global: &GlobalArgs) -> Result<(), String> {
    let config = resolve_config(global)?;
    let toml_string = config
        .to_toml_string()
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    match args.action {
        ConfigAction::Show => write_output(&toml_string, None),
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
            fs::write(&path, toml_string)
                .map_err(|e| format!("Failed to write config: {}", e))?;
            log_success(&format!("Wrote {}", path.display()), global.quiet);
            Ok(())
        }
    }
}
