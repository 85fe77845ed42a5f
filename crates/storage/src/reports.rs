//! The saved-report collection.
//!
//! The whole collection lives in one JSON array under [`REPORTS_KEY`]. Every
//! mutation rewrites the full array. The in-memory copy held here is
//! authoritative: a failed write is reported back to the caller but never
//! rolls the collection back.

use crate::{BlobStore, Result, StorageError};
use actreport_report::ActivityReport;
use std::collections::HashSet;

/// Blob key holding the serialized collection.
pub const REPORTS_KEY: &str = "activityReports";

/// How `save_or_update` merges a record into the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMode {
    /// Append with a freshly assigned id.
    Insert,
    /// Replace the record with this id, keeping its position.
    Update(String),
}

impl SaveMode {
    /// Build from the form's `(isUpdate, editId)` pair. An update without an
    /// id falls back to an insert.
    pub fn from_flags(is_update: bool, edit_id: Option<&str>) -> Self {
        match (is_update, edit_id) {
            (true, Some(id)) if !id.is_empty() => SaveMode::Update(id.to_string()),
            (true, _) => {
                tracing::warn!("Update requested without an id, inserting instead");
                SaveMode::Insert
            }
            (false, _) => SaveMode::Insert,
        }
    }
}

/// Collection after a mutation, plus the write error if persisting failed.
#[derive(Debug)]
pub struct Persisted {
    pub reports: Vec<ActivityReport>,
    pub write_error: Option<StorageError>,
}

impl Persisted {
    /// Whether the collection reached the blob store.
    pub fn is_durable(&self) -> bool {
        self.write_error.is_none()
    }
}

#[derive(Debug)]
pub struct SaveOutcome {
    /// The record as stored, with its id and timestamp.
    pub saved: ActivityReport,
    pub persisted: Persisted,
}

pub struct ReportStore<B: BlobStore> {
    blobs: B,
    key: String,
    reports: Vec<ActivityReport>,
    last_stamp: i64,
}

impl<B: BlobStore> ReportStore<B> {
    /// Open the collection stored under [`REPORTS_KEY`].
    pub fn open(blobs: B) -> Self {
        Self::with_key(blobs, REPORTS_KEY)
    }

    pub fn with_key(blobs: B, key: impl Into<String>) -> Self {
        let mut store = Self {
            blobs,
            key: key.into(),
            reports: Vec::new(),
            last_stamp: 0,
        };
        store.reload();
        store
    }

    /// Read and parse the stored collection.
    ///
    /// Never fails: a missing blob, a read error or an unparseable blob all
    /// mean "no saved reports". Elements of a valid array that do not parse
    /// as reports, have no id, or repeat an earlier id are skipped.
    pub fn load_all(&self) -> Vec<ActivityReport> {
        let raw = match self.blobs.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read saved reports: {}", e);
                return Vec::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Saved reports are not a JSON array, ignoring: {}", e);
                return Vec::new();
            }
        };

        let mut reports = Vec::with_capacity(values.len());
        let mut seen = HashSet::new();
        for (idx, value) in values.into_iter().enumerate() {
            let report = match serde_json::from_value::<ActivityReport>(value) {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!(index = idx, "Skipping malformed saved report: {}", e);
                    continue;
                }
            };
            if report.id.is_empty() {
                tracing::warn!(index = idx, "Skipping saved report without an id");
                continue;
            }
            if !seen.insert(report.id.clone()) {
                tracing::warn!(
                    index = idx,
                    id = %report.id,
                    "Skipping saved report with a duplicate id"
                );
                continue;
            }
            reports.push(report);
        }
        reports
    }

    /// Replace the in-memory collection with what is stored.
    pub fn reload(&mut self) -> &[ActivityReport] {
        self.reports = self.load_all();
        self.last_stamp = self
            .reports
            .iter()
            .flat_map(|r| [r.timestamp, r.id.parse::<i64>().unwrap_or(0)])
            .max()
            .unwrap_or(0);
        tracing::debug!(count = self.reports.len(), "Loaded saved reports");
        &self.reports
    }

    pub fn reports(&self) -> &[ActivityReport] {
        &self.reports
    }

    pub fn get(&self, id: &str) -> Option<&ActivityReport> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Insert or replace a record and persist the collection.
    ///
    /// Fails only when updating an id that is not in the collection; the
    /// collection is unchanged in that case. A failed write is returned in
    /// [`Persisted::write_error`] with the collection already updated.
    pub fn save_or_update(
        &mut self,
        mut report: ActivityReport,
        mode: SaveMode,
    ) -> Result<SaveOutcome> {
        let stamp = self.next_stamp();
        report.timestamp = stamp;

        match mode {
            SaveMode::Insert => {
                report.id = stamp.to_string();
                tracing::info!(id = %report.id, "Saving new report");
                self.reports.push(report.clone());
            }
            SaveMode::Update(edit_id) => {
                let slot = self
                    .reports
                    .iter_mut()
                    .find(|r| r.id == edit_id)
                    .ok_or_else(|| StorageError::NotFound(format!("report {edit_id}")))?;
                report.id = edit_id;
                tracing::info!(id = %report.id, "Updating report");
                *slot = report.clone();
            }
        }

        Ok(SaveOutcome {
            saved: report,
            persisted: self.persist(),
        })
    }

    /// Remove the record with `id` and persist. Removing an unknown id
    /// leaves the collection as it was.
    pub fn delete(&mut self, id: &str) -> Persisted {
        match self.reports.iter().position(|r| r.id == id) {
            Some(idx) => {
                self.reports.remove(idx);
                tracing::info!(id, "Deleted report");
            }
            None => tracing::warn!(id, "Delete requested for unknown report"),
        }
        self.persist()
    }

    fn persist(&self) -> Persisted {
        let write_error = match serde_json::to_string(&self.reports) {
            Ok(json) => self.blobs.write(&self.key, &json).err(),
            Err(e) => Some(StorageError::from(e)),
        };
        if let Some(e) = &write_error {
            tracing::warn!("Failed to persist reports, keeping them in memory: {}", e);
        }
        Persisted {
            reports: self.reports.clone(),
            write_error,
        }
    }

    /// Millisecond stamp strictly after every stamp seen so far.
    fn next_stamp(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let stamp = now.max(self.last_stamp + 1);
        self.last_stamp = stamp;
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryBlobStore;

    #[test]
    fn test_save_mode_from_flags() {
        assert_eq!(SaveMode::from_flags(false, Some("1")), SaveMode::Insert);
        assert_eq!(
            SaveMode::from_flags(true, Some("1")),
            SaveMode::Update("1".to_string())
        );
        assert_eq!(SaveMode::from_flags(true, None), SaveMode::Insert);
        assert_eq!(SaveMode::from_flags(true, Some("")), SaveMode::Insert);
    }

    #[test]
    fn test_stamps_strictly_increase() {
        let mut store = ReportStore::open(InMemoryBlobStore::new());
        let a = store.next_stamp();
        let b = store.next_stamp();
        let c = store.next_stamp();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_stamps_continue_after_loaded_future_ids() {
        let blobs = InMemoryBlobStore::new();
        let future = chrono::Utc::now().timestamp_millis() + 60_000;
        blobs
            .write(REPORTS_KEY, &format!(r#"[{{"id": "{future}", "timestamp": 5}}]"#))
            .unwrap();

        let mut store = ReportStore::open(blobs);
        assert!(store.next_stamp() > future);
    }
}
