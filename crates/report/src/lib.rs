//! Activity report data model.
//!
//! This is the single source of truth for report data. The storage crate
//! persists it as JSON, the export crate renders its resolved preview.

mod checklist;
mod field;
mod record;

pub mod preview;

pub use checklist::{ChecklistItem, Documentation};
pub use field::{FieldError, ReportField};
pub use preview::{NumberedItem, PreviewDocument, PreviewOptions, SignatureBlock};
pub use record::{ActivityReport, ActivityType, Nature, Schedule, TimePeriod};
