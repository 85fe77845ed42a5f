use crate::{Result, SessionError, ViewMode};
use actreport_events::{
    event_names, EventBusRef, ExportCompletedEvent, ExportFailedEvent, Notice, NullEventBus,
    ReportDeletedEvent, ReportSavedEvent, StorageWriteFailedEvent,
};
use actreport_export::{export, DocumentRenderer, ExportArtifact, PageGeometry};
use actreport_report::{ActivityReport, ChecklistItem, PreviewDocument, PreviewOptions, ReportField};
use actreport_storage::{BlobStore, Persisted, ReportStore, SaveMode, StorageError};
use serde::Serialize;
use std::sync::Arc;

/// Which record an export renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// The working record, saved or not.
    Current,
    /// A record from the saved collection.
    Saved(String),
}

pub struct ReportSession<B: BlobStore> {
    store: ReportStore<B>,
    working: ActivityReport,
    editing_id: Option<String>,
    mode: ViewMode,
    bus: EventBusRef,
    options: PreviewOptions,
    geometry: PageGeometry,
}

impl<B: BlobStore> ReportSession<B> {
    pub fn new(store: ReportStore<B>, bus: EventBusRef) -> Self {
        Self {
            store,
            working: ActivityReport::new(),
            editing_id: None,
            mode: ViewMode::Editing,
            bus,
            options: PreviewOptions::default(),
            geometry: PageGeometry::A4_96DPI,
        }
    }

    /// Session that reports nothing.
    pub fn detached(store: ReportStore<B>) -> Self {
        Self::new(store, Arc::new(NullEventBus))
    }

    pub fn with_options(mut self, options: PreviewOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn working(&self) -> &ActivityReport {
        &self.working
    }

    /// Direct access to the working record. Bypasses the mode check.
    pub fn working_mut(&mut self) -> &mut ActivityReport {
        &mut self.working
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Id of the saved record being edited, if any.
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn reports(&self) -> &[ActivityReport] {
        self.store.reports()
    }

    pub fn store(&self) -> &ReportStore<B> {
        &self.store
    }

    pub fn options(&self) -> PreviewOptions {
        self.options
    }

    pub fn set_field(&mut self, field: ReportField, value: &str) -> Result<()> {
        self.ensure_editable()?;
        self.working.apply(field, value)?;
        tracing::debug!(field = %field, "Field updated");
        Ok(())
    }

    pub fn set_documentation(&mut self, item: ChecklistItem, checked: bool) -> Result<()> {
        self.ensure_editable()?;
        self.working.documentation.set(item, checked);
        Ok(())
    }

    pub fn enter_preview(&mut self) {
        self.mode = ViewMode::Previewing;
    }

    pub fn exit_preview(&mut self) {
        self.mode = ViewMode::Editing;
    }

    /// Resolved read-only view of the working record.
    pub fn preview(&self) -> PreviewDocument {
        PreviewDocument::resolve(&self.working, self.options)
    }

    /// Insert the working record, or update the record it was loaded from.
    ///
    /// The working record picks up the stored id and timestamp and the
    /// editing marker is cleared, so a second save inserts a new record.
    /// If the record being edited has since been deleted, the edits are
    /// inserted as a new record.
    pub fn save(&mut self) -> Result<ActivityReport> {
        let mode = match &self.editing_id {
            Some(id) => SaveMode::Update(id.clone()),
            None => SaveMode::Insert,
        };
        let mut updated = matches!(mode, SaveMode::Update(_));

        let outcome = match self.store.save_or_update(self.working.clone(), mode) {
            Err(StorageError::NotFound(missing)) if updated => {
                tracing::warn!("Edited {} no longer exists, saving as new", missing);
                self.editing_id = None;
                updated = false;
                self.store.save_or_update(self.working.clone(), SaveMode::Insert)?
            }
            other => other?,
        };
        let saved = outcome.saved;

        let (topic, title) = if updated {
            (event_names::REPORT_UPDATED, "Report Updated")
        } else {
            (event_names::REPORT_SAVED, "Report Saved")
        };
        self.emit(
            topic,
            &ReportSavedEvent {
                notice: Notice::new(title, "Activity report has been saved successfully."),
                id: saved.id.clone(),
                timestamp: saved.timestamp,
                updated,
            },
        );
        self.report_write_failure(&outcome.persisted);

        self.working = saved.clone();
        self.editing_id = None;
        Ok(saved)
    }

    /// Replace the working record with `report` and mark it as being edited.
    pub fn load_report_for_edit(&mut self, report: ActivityReport) {
        tracing::debug!(id = %report.id, "Loading report for edit");
        self.editing_id = Some(report.id.clone()).filter(|id| !id.is_empty());
        self.working = report;
    }

    /// Load the saved record with `id` for editing.
    pub fn load_for_edit(&mut self, id: &str) -> Result<()> {
        let report = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        self.load_report_for_edit(report);
        Ok(())
    }

    /// Reset to an empty record. Works in either mode.
    pub fn clear(&mut self) {
        self.working = ActivityReport::new();
        self.editing_id = None;
    }

    /// Remove a saved record. Unknown ids leave the collection unchanged.
    pub fn delete(&mut self, id: &str) -> Vec<ActivityReport> {
        let persisted = self.store.delete(id);
        self.emit(
            event_names::REPORT_DELETED,
            &ReportDeletedEvent {
                notice: Notice::new(
                    "Report Deleted",
                    "Activity report has been deleted successfully.",
                ),
                id: id.to_string(),
                remaining: persisted.reports.len(),
            },
        );
        self.report_write_failure(&persisted);
        persisted.reports
    }

    /// Render `target` through `renderer`.
    ///
    /// The session is in `Previewing` while rendering and is back in
    /// `Editing` when this returns, whether rendering succeeded or not.
    pub fn export<R: DocumentRenderer + ?Sized>(
        &mut self,
        target: ExportTarget,
        renderer: &R,
    ) -> Result<ExportArtifact> {
        let (report, report_id) = match &target {
            ExportTarget::Current => {
                let id = Some(self.working.id.clone()).filter(|id| !id.is_empty());
                (self.working.clone(), id)
            }
            ExportTarget::Saved(id) => {
                let report = self
                    .store
                    .get(id)
                    .cloned()
                    .ok_or_else(|| SessionError::NotFound(id.clone()))?;
                (report, Some(id.clone()))
            }
        };

        self.mode = ViewMode::Previewing;
        let document = PreviewDocument::resolve(&report, self.options);
        let result = export(&document, renderer, &self.geometry);
        self.mode = ViewMode::Editing;

        match result {
            Ok(artifact) => {
                tracing::info!(file = %artifact.file_name, "Exported report");
                self.emit(
                    event_names::EXPORT_COMPLETED,
                    &ExportCompletedEvent {
                        notice: Notice::new(
                            "PDF Exported",
                            format!("Saved as {}", artifact.file_name),
                        ),
                        file_name: artifact.file_name.clone(),
                        size_bytes: artifact.size(),
                        report_id,
                    },
                );
                Ok(artifact)
            }
            Err(e) => {
                tracing::warn!("Export failed: {}", e);
                self.emit(
                    event_names::EXPORT_FAILED,
                    &ExportFailedEvent {
                        notice: Notice::new("Export Failed", e.to_string()),
                        error: e.to_string(),
                        report_id,
                    },
                );
                Err(e.into())
            }
        }
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.mode.is_editable() {
            Ok(())
        } else {
            Err(SessionError::NotEditable)
        }
    }

    fn report_write_failure(&self, persisted: &Persisted) {
        if let Some(e) = &persisted.write_error {
            self.emit(
                event_names::STORAGE_WRITE_FAILED,
                &StorageWriteFailedEvent {
                    notice: Notice::new(
                        "Storage Error",
                        "Changes are kept in memory but could not be saved to storage.",
                    ),
                    error: e.to_string(),
                },
            );
        }
    }

    fn emit<T: Serialize>(&self, topic: &str, event: &T) {
        match serde_json::to_value(event) {
            Ok(payload) => self.bus.emit(topic, payload),
            Err(e) => tracing::warn!(topic, "Failed to serialize event: {}", e),
        }
    }
}

impl<B: BlobStore> std::fmt::Debug for ReportSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportSession")
            .field("reports", &self.store.len())
            .field("working", &self.working.display_title())
            .field("editing_id", &self.editing_id)
            .field("mode", &self.mode)
            .field("bus", &"EventBusRef")
            .field("options", &self.options)
            .finish()
    }
}
