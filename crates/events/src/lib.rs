//! Notification contracts emitted by the report session.
//!
//! Every event carries a short `title`/`description` pair (what a toast
//! would show) plus typed details. Using shared types keeps producers and
//! consumers from drifting apart on field names.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{
    EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus, TracingEventBus,
};

use serde::{Deserialize, Serialize};

/// Human-readable part of every notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A report was inserted or updated in the collection.
///
/// Producers: session `save`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSavedEvent {
    #[serde(flatten)]
    pub notice: Notice,
    pub id: String,
    /// Milliseconds since epoch of the save.
    pub timestamp: i64,
    /// True when an existing record was replaced.
    pub updated: bool,
}

/// A report was removed from the collection.
///
/// Producers: session `delete`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDeletedEvent {
    #[serde(flatten)]
    pub notice: Notice,
    pub id: String,
    /// Records left in the collection.
    pub remaining: usize,
}

/// The collection changed in memory but could not be written out.
///
/// Producers: session `save`, `delete`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageWriteFailedEvent {
    #[serde(flatten)]
    pub notice: Notice,
    pub error: String,
}

/// An export artifact was produced.
///
/// Producers: session `export`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportCompletedEvent {
    #[serde(flatten)]
    pub notice: Notice,
    pub file_name: String,
    pub size_bytes: usize,
    /// Id of the exported record, if it has been saved.
    #[serde(default)]
    pub report_id: Option<String>,
}

/// Rendering failed; the session is back in editing mode.
///
/// Producers: session `export`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFailedEvent {
    #[serde(flatten)]
    pub notice: Notice,
    pub error: String,
    #[serde(default)]
    pub report_id: Option<String>,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// New report appended to the collection.
    pub const REPORT_SAVED: &str = "report:saved";
    /// Existing report replaced in place.
    pub const REPORT_UPDATED: &str = "report:updated";
    /// Report removed.
    pub const REPORT_DELETED: &str = "report:deleted";
    /// Collection could not be persisted.
    pub const STORAGE_WRITE_FAILED: &str = "storage:write_failed";
    /// Export artifact produced.
    pub const EXPORT_COMPLETED: &str = "export:completed";
    /// Export failed.
    pub const EXPORT_FAILED: &str = "export:failed";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_event_flattens_notice() {
        let event = ReportSavedEvent {
            notice: Notice::new("Report Saved", "Activity report has been saved successfully."),
            id: "1726300000000".to_string(),
            timestamp: 1726300000000,
            updated: false,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["title"], "Report Saved");
        assert_eq!(json["id"], "1726300000000");
        assert!(json.get("notice").is_none());
    }

    #[test]
    fn test_export_failed_deserialize_minimal() {
        let json = r#"{"title": "Export Failed", "description": "", "error": "boom"}"#;
        let event: ExportFailedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.error, "boom");
        assert_eq!(event.report_id, None);
    }
}
