//! The activity report record and its enumerated fields.

use crate::checklist::Documentation;
use serde::{Deserialize, Serialize};

/// AM/PM tag attached to the wall-clock `time` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimePeriod {
    #[default]
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl TimePeriod {
    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::Am => "AM",
            TimePeriod::Pm => "PM",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "AM" => Some(TimePeriod::Am),
            "PM" => Some(TimePeriod::Pm),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where the activity took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Nature {
    Outdoor,
    Indoor,
    Online,
    /// Nothing selected yet. Stored as an empty string.
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Nature {
    pub const ALL: [Nature; 3] = [Nature::Outdoor, Nature::Indoor, Nature::Online];

    pub fn label(&self) -> &'static str {
        match self {
            Nature::Outdoor => "Outdoor",
            Nature::Indoor => "Indoor",
            Nature::Online => "Online",
            Nature::Unset => "",
        }
    }

    /// Parse a label; the empty string maps to [`Nature::Unset`].
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Some(Nature::Unset);
        }
        Self::ALL
            .into_iter()
            .find(|n| n.label().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Nature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Category of the activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActivityType {
    Academic,
    Extension,
    #[serde(rename = "Student Progression")]
    StudentProgression,
    #[serde(rename = "Student Support")]
    StudentSupport,
    Environment,
    Gender,
    Days,
    Enrichment,
    /// Free-text escape; the label lives in `customActivityType`.
    #[serde(rename = "Other(Specify)")]
    Other,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl ActivityType {
    /// Selectable values in menu order.
    pub const ALL: [ActivityType; 9] = [
        ActivityType::Academic,
        ActivityType::Extension,
        ActivityType::StudentProgression,
        ActivityType::StudentSupport,
        ActivityType::Environment,
        ActivityType::Gender,
        ActivityType::Days,
        ActivityType::Enrichment,
        ActivityType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Academic => "Academic",
            ActivityType::Extension => "Extension",
            ActivityType::StudentProgression => "Student Progression",
            ActivityType::StudentSupport => "Student Support",
            ActivityType::Environment => "Environment",
            ActivityType::Gender => "Gender",
            ActivityType::Days => "Days",
            ActivityType::Enrichment => "Enrichment",
            ActivityType::Other => "Other(Specify)",
            ActivityType::Unset => "",
        }
    }

    /// Parse a label; the empty string maps to [`ActivityType::Unset`].
    /// "Other" and "Other (Specify)" are accepted for the escape value.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Some(ActivityType::Unset);
        }
        let compact: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.eq_ignore_ascii_case("other") || compact.eq_ignore_ascii_case("other(specify)")
        {
            return Some(ActivityType::Other);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whether the activity was part of the planned calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Schedule {
    Scheduled,
    Unscheduled,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Schedule {
    pub const ALL: [Schedule; 2] = [Schedule::Scheduled, Schedule::Unscheduled];

    pub fn label(&self) -> &'static str {
        match self {
            Schedule::Scheduled => "Scheduled",
            Schedule::Unscheduled => "Unscheduled",
            Schedule::Unset => "",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Some(Schedule::Unset);
        }
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One activity report.
///
/// Field names serialize in camelCase and match the stored blob format
/// field for field. Missing fields fall back to their defaults so blobs
/// written before a field existed still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityReport {
    /// Assigned by the store on first save. Empty for unsaved records.
    pub id: String,
    /// Last save time in milliseconds since epoch. 0 for unsaved records.
    pub timestamp: i64,

    pub year1: String,
    pub year2: String,
    pub department: String,
    pub iqac_doc_no: String,
    pub activity_title: String,
    pub coordinator_name: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub venue: String,
    /// Wall clock `HH:MM`.
    pub time: String,
    pub time_period: TimePeriod,

    /// Participant count, kept as entered.
    pub participants: String,
    pub nature: Nature,
    pub activity_type: ActivityType,
    pub custom_activity_type: String,
    pub schedule: Schedule,
    pub funding_source: String,
    pub amount: u64,
    pub chief_guest: String,

    pub topic: String,
    pub objectives: String,
    pub methodology: String,
    pub outcomes: String,

    pub documentation: Documentation,

    pub footer_iqac_doc: String,
    pub attribute_name: String,
    pub dept_file_no: String,
    pub iqac_file_no: String,

    pub teacher_name: String,
    pub teacher_date: String,
    pub head_name: String,
    pub head_date: String,
    pub iqac_coordinator: String,
    pub iqac_date: String,
    pub ic_principal_name: String,
    pub ic_principal_date: String,
}

impl ActivityReport {
    /// A blank, never-saved report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the store has assigned this record an id.
    pub fn is_saved(&self) -> bool {
        !self.id.is_empty()
    }

    /// The activity type as it should be displayed.
    ///
    /// For "Other(Specify)" this is the custom label, or "Other" when the
    /// label was left blank. `None` when no type was selected.
    pub fn effective_activity_type(&self) -> Option<&str> {
        match self.activity_type {
            ActivityType::Unset => None,
            ActivityType::Other => {
                let custom = self.custom_activity_type.trim();
                if custom.is_empty() {
                    Some("Other")
                } else {
                    Some(custom)
                }
            }
            other => Some(other.label()),
        }
    }

    /// Title used in history listings.
    pub fn display_title(&self) -> &str {
        if self.activity_title.trim().is_empty() {
            "Untitled Activity"
        } else {
            &self.activity_title
        }
    }
}
