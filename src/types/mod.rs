//! Record, span, catalog and issue types.

mod catalog;
mod ext;
mod issue;
mod record;

pub use catalog::{Catalog, CLOSED_FORM_LABELS, INTENT_LABELS, OPEN_VOCABULARY_LABELS};
pub use ext::SpanSliceExt;
pub use issue::IssueCode;
pub use record::{Intents, Record, RecordKind, Span};
