//! The single report being edited, its presentation mode, and the
//! save/delete/export actions around it.

mod mode;
mod session;

pub use mode::ViewMode;
pub use session::{ExportTarget, ReportSession};

use actreport_export::ExportError;
use actreport_report::FieldError;
use actreport_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Report is in preview mode and cannot be edited")]
    NotEditable,

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
