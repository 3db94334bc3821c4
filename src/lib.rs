//! # spanguard
//!
//! Audit and repair of labeled NER/intent training data for security and
//! OSINT models.
//!
//! - **Validation**: boundary alignment, length floor, denylists, and regex
//!   full-match for closed-form labels (IPs, CVEs, hashes, emails, ...)
//! - **Repair**: whitespace trimming for every label; re-anchoring to the
//!   nearest real pattern match for closed-form labels
//! - **Overlap resolution**: greedy, earliest then longest first
//! - **Intents**: threshold scores to exactly `0.0` / `1.0`
//! - **Files**: JSONL in, JSONL out, with a timestamped backup before any
//!   in-place rewrite
//!
//! ## Quick Start
//!
//! ```rust
//! use spanguard::{Auditor, AuditConfig, Record, Span};
//!
//! let auditor = Auditor::new(AuditConfig::default())?;
//!
//! let record = Record::with_entities(
//!     "Block evil.example.com, then reconnect 192.168.1.1/24 now",
//!     vec![
//!         Span::new(6, 22, "DOMAIN"),
//!         Span::new(39, 53, "IP_ADDRESS"), // includes "/24"
//!     ],
//! );
//!
//! let (fixed, stats) = auditor.process(&record);
//! assert_eq!(
//!     fixed.entities.unwrap(),
//!     vec![Span::new(6, 22, "DOMAIN"), Span::new(39, 50, "IP_ADDRESS")]
//! );
//! assert_eq!(stats.repaired, 1);
//! # Ok::<(), spanguard::Error>(())
//! ```
//!
//! ## Offsets
//!
//! Record offsets are **character** offsets. Everything that touches regex
//! or string slicing converts through [`offset::SpanConverter`], so non-ASCII
//! text never shifts a span.
//!
//! ## Configuration
//!
//! [`AuditConfig`] carries every tunable and starts from a [`Profile`]
//! (`default`, `strict`, `lenient`). [`AuditConfig::toolkit`] builds the
//! immutable pattern registry, denylist and catalog once; validators and
//! repairers borrow them.
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! spanguard = "0.1"                                        # sequential
//! spanguard = { version = "0.1", features = ["parallel"] } # one worker per file
//! ```

#![warn(missing_docs)]

pub mod align;
pub mod audit;
pub mod cli;
pub mod config;
pub mod denylist;
mod error;
pub mod intent;
pub mod offset;
pub mod overlap;
pub mod patterns;
pub mod repair;
pub mod toolkit;
pub mod types;
pub mod validate;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use spanguard::prelude::*;
    //!
    //! let toolkit = Toolkit::builtin();
    //! let v = toolkit.validator().validate("Patch CVE-2021-44228", &Span::new(6, 20, "CVE_ID"));
    //! assert!(v.is_valid());
    //! ```
    pub use crate::audit::{Auditor, AuditReport, FileReport, RecordStats, WriteMode};
    pub use crate::config::{AuditConfig, Profile, UnknownLabelPolicy};
    pub use crate::error::{Error, Result};
    pub use crate::repair::SpanFix;
    pub use crate::toolkit::Toolkit;
    pub use crate::types::{IssueCode, Record, Span, SpanSliceExt};
    pub use crate::validate::Validation;
}

// Re-exports
pub use align::{AlignmentMode, AlignSummary};
pub use audit::{discover_files, AuditReport, Auditor, FileReport, RecordStats, WriteMode};
pub use config::{AuditConfig, BackupNaming, Profile, UnknownLabelPolicy};
pub use denylist::Denylist;
pub use error::{Error, Result};
pub use intent::{binarize, binarize_intents, IntentPolicy, IntentStats};
pub use offset::{SpanConverter, TextSpan};
pub use overlap::{resolve_overlaps, Resolution};
pub use patterns::{PatternEntry, PatternRegistry};
pub use repair::{RepairSettings, SpanFix, SpanRepairer};
pub use toolkit::Toolkit;
pub use types::{Catalog, Intents, IssueCode, Record, RecordKind, Span, SpanSliceExt};
pub use validate::{SpanValidator, Validation, ValidationRules};
