//! CLI argument parsing and structure definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::commands;
use crate::Profile;

/// Entity-span and intent-label audit/repair for NER training data
#[derive(Parser)]
#[command(name = "spanguard")]
#[command(
    author,
    version,
    about = "Entity-span and intent-label audit/repair for NER training data",
    long_about = r#"
spanguard - audit and repair labeled JSONL training data

CHECKS (per span, in order):
  1. Boundary sanity     0 <= start < end <= len(text)
  2. Whitespace          no leading/trailing whitespace
  3. Length              at least 2 chars (short-form labels exempt)
  4. Mid-word cut        no letter/digit/_ on either side
  5. Denylist            common words, label-specific tokens
  6. Pattern             closed-form labels must fully match their regex
  7. Punctuation         not punctuation-only

REPAIR:
  Whitespace is trimmed for every label. Closed-form labels (IP_ADDRESS,
  CVE_ID, ...) are re-anchored to the nearest real match. Everything else
  that fails is removed. Overlaps keep the earliest, then longest, span.

EXAMPLES:
  spanguard audit data/
  spanguard fix data/apt/apt_entities.jsonl --apply
  spanguard check -t "Reconnect 192.168.1.1/24 now" -s IP_ADDRESS:10:24
  spanguard patterns --test CVE-2021-44228
"#
)]
#[command(propagate_version = true)]
#[allow(missing_docs)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration profile
    #[arg(long, short = 'p', global = true, value_enum)]
    pub profile: Option<Profile>,

    /// TOML config file layered over the profile
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Audit files without modifying them
    #[command(visible_alias = "a")]
    Audit(commands::AuditArgs),

    /// Fix files (dry run unless --apply or --output)
    #[command(visible_alias = "f")]
    Fix(commands::FixArgs),

    /// Validate one span and show its repair
    #[command(visible_alias = "c")]
    Check(commands::CheckArgs),

    /// List registry patterns or test a string against them
    Patterns(commands::PatternsArgs),

    /// Count spans the trainer's token alignment would drop or reshape
    Align(commands::AlignArgs),

    /// Show or write the resolved configuration
    Config(commands::ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output (default)
    #[default]
    Human,
    /// Pretty JSON
    Json,
}
