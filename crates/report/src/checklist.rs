//! Documentation checklist.
//!
//! The checklist vocabulary is fixed and order-significant: preview
//! numbering follows the canonical order below, not the order in which
//! items were ticked.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One documentation-evidence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChecklistItem {
    ApprovalLetter,
    GuestSpeakerInvitation,
    Notice,
    Flyer,
    PreRegistrationList,
    BudgetSanction,
    SignatureAttendance,
    GeotaggedPhotos,
    ProgramReels,
    FeedbackAnalysis,
    CertificateOfAppreciation,
    EventReport,
    AnnualReportMention,
    Publicity,
}

impl ChecklistItem {
    /// All items in canonical order.
    pub const ALL: [ChecklistItem; 14] = [
        ChecklistItem::ApprovalLetter,
        ChecklistItem::GuestSpeakerInvitation,
        ChecklistItem::Notice,
        ChecklistItem::Flyer,
        ChecklistItem::PreRegistrationList,
        ChecklistItem::BudgetSanction,
        ChecklistItem::SignatureAttendance,
        ChecklistItem::GeotaggedPhotos,
        ChecklistItem::ProgramReels,
        ChecklistItem::FeedbackAnalysis,
        ChecklistItem::CertificateOfAppreciation,
        ChecklistItem::EventReport,
        ChecklistItem::AnnualReportMention,
        ChecklistItem::Publicity,
    ];

    /// The stored (and displayed) label.
    pub fn label(&self) -> &'static str {
        match self {
            ChecklistItem::ApprovalLetter => "Approval letter",
            ChecklistItem::GuestSpeakerInvitation => "Guest speaker invitation",
            ChecklistItem::Notice => "Notice",
            ChecklistItem::Flyer => "Flyer",
            ChecklistItem::PreRegistrationList => "Pre-Registration list",
            ChecklistItem::BudgetSanction => "Budget sanction",
            ChecklistItem::SignatureAttendance => {
                "Signature Attendance of Participants: Counter-signature by Guest"
            }
            ChecklistItem::GeotaggedPhotos => {
                "High-quality, geotagged photos with accurate event tagging"
            }
            ChecklistItem::ProgramReels => "Some small reels of essential parts of the program",
            ChecklistItem::FeedbackAnalysis => "Feedback & Feedback analysis",
            ChecklistItem::CertificateOfAppreciation => "Certificate of Appreciation",
            ChecklistItem::EventReport => "Event Report",
            ChecklistItem::AnnualReportMention => "Annual Report mentioning activity",
            ChecklistItem::Publicity => "Publicity",
        }
    }

    /// Exact label match, as stored in blobs.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.label() == label)
    }

    /// Lenient match for user input: case-insensitive, surrounding
    /// whitespace ignored, or a 1-based position in the canonical list.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(position) = input.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|idx| Self::ALL.get(idx).copied());
        }
        Self::ALL
            .into_iter()
            .find(|item| item.label().eq_ignore_ascii_case(input))
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Presence flags for every checklist item.
///
/// Serialized as a `{label: bool}` map holding only the checked items.
/// Unknown labels in stored data are dropped on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Documentation {
    checked: [bool; 14],
}

impl Documentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self, item: ChecklistItem) -> bool {
        self.checked[item.index()]
    }

    pub fn set(&mut self, item: ChecklistItem, checked: bool) {
        self.checked[item.index()] = checked;
    }

    /// Checked items in canonical order.
    pub fn checked(&self) -> impl Iterator<Item = ChecklistItem> + '_ {
        ChecklistItem::ALL
            .into_iter()
            .filter(move |item| self.is_checked(*item))
    }

    /// Checked items paired with their 1-based preview number.
    pub fn numbered(&self) -> Vec<(usize, ChecklistItem)> {
        self.checked()
            .enumerate()
            .map(|(idx, item)| (idx + 1, item))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.checked.iter().any(|c| *c)
    }

    pub fn len(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }
}

impl Serialize for Documentation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for item in self.checked() {
            map.serialize_entry(item.label(), &true)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Documentation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        let mut documentation = Documentation::new();
        for (label, checked) in raw {
            match ChecklistItem::from_label(&label) {
                Some(item) => documentation.set(item, checked),
                None => tracing::debug!(label = %label, "Ignoring unknown documentation item"),
            }
        }
        Ok(documentation)
    }
}
