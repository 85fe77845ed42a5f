//! Presentation mode of the working report.

use serde::{Deserialize, Serialize};

/// Whether the working report is shown as live inputs or as static text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Fields accept edits.
    #[default]
    Editing,

    /// Read-only layout, used for export and for a read view.
    Previewing,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Editing => "Editing",
            ViewMode::Previewing => "Previewing",
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, ViewMode::Editing)
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
