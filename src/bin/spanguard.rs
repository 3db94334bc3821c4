//! spanguard - audit and repair labeled NER/intent training data
//!
//! ```bash
//! # Report what would change
//! spanguard audit data/
//!
//! # Rewrite in place (a timestamped backup is written first)
//! spanguard fix data/ --apply
//!
//! # Try one span
//! spanguard check -t "Reconnect 192.168.1.1/24 now" -s IP_ADDRESS:10:24
//! ```

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use env_logger::{Builder, Env};

use spanguard::cli::commands::{align, audit, check, config, fix, patterns};
use spanguard::cli::output::color;
use spanguard::cli::utils::log_level;
use spanguard::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    Builder::from_env(Env::default().default_filter_or(log_level(&cli.global).as_str()))
        .format_timestamp(None)
        .init();

    let global = &cli.global;
    let result: Result<(), String> = match cli.command {
        Commands::Audit(args) => audit::run(args, global),
        Commands::Fix(args) => fix::run(args, global),
        Commands::Check(args) => check::run(args, global),
        Commands::Patterns(args) => patterns::run(args, global),
        Commands::Align(args) => align::run(args, global),
        Commands::Config(args) => config::run(args, global),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "spanguard", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
