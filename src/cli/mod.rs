//! CLI library modules for the spanguard binary.
//!
//! This module provides reusable CLI functionality that can be tested
//! independently of the binary.

pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use parser::{Cli, Commands, GlobalArgs, OutputFormat};
