//! Command implementations for the spanguard CLI
//!
//! Each command has its own module with an `Args` struct and a `run`
//! function returning `Result<(), String>`.

pub mod align;
pub mod audit;
pub mod check;
pub mod config;
pub mod fix;
pub mod patterns;

// Re-export argument types for parser
pub use align::AlignArgs;
pub use audit::AuditArgs;
pub use check::CheckArgs;
pub use config::{ConfigAction, ConfigArgs};
pub use fix::FixArgs;
pub use patterns::PatternsArgs;
