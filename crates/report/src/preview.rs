//! Read-only, fully resolved form of a report.
//!
//! Everything a renderer needs is already formatted here: dates, enum
//! labels, the effective activity type and the numbered checklist. Both the
//! text preview and the document export consume this type, so the two never
//! disagree.

use crate::record::ActivityReport;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewOptions {
    /// Print the teacher's date under every signature, as documents
    /// exported by the old web form did.
    #[serde(default)]
    pub legacy_signature_dates: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedItem {
    pub number: usize,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureBlock {
    pub role: &'static str,
    pub name: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewDocument {
    pub year1: String,
    pub year2: String,
    pub department: String,
    pub iqac_doc_no: String,
    pub title: String,
    pub coordinator: String,
    pub day_and_date: String,
    pub venue: String,
    pub time: String,
    pub participants: String,
    pub nature: String,
    pub activity_type: String,
    pub schedule: String,
    pub funding_source: String,
    pub amount: String,
    pub chief_guest: String,
    pub topic: String,
    pub objectives: String,
    pub methodology: String,
    pub outcomes: String,
    pub documentation: Vec<NumberedItem>,
    pub footer_iqac_doc: String,
    pub attribute_name: String,
    pub dept_file_no: String,
    pub iqac_file_no: String,
    pub signatures: Vec<SignatureBlock>,
}

impl PreviewDocument {
    pub fn resolve(report: &ActivityReport, options: PreviewOptions) -> Self {
        let signature_date = |own: &str| {
            if options.legacy_signature_dates {
                short_date(&report.teacher_date)
            } else {
                short_date(own)
            }
        };

        let signatures = vec![
            SignatureBlock {
                role: "NAME OF TEACHER",
                name: report.teacher_name.clone(),
                date: short_date(&report.teacher_date),
            },
            SignatureBlock {
                role: "COMMITTEE INCHARGE",
                name: report.head_name.clone(),
                date: signature_date(&report.head_date),
            },
            SignatureBlock {
                role: "IQAC COORDINATOR",
                name: report.iqac_coordinator.clone(),
                date: signature_date(&report.iqac_date),
            },
            SignatureBlock {
                role: "IC PRINCIPAL",
                name: report.ic_principal_name.clone(),
                date: signature_date(&report.ic_principal_date),
            },
        ];

        let time = if report.time.is_empty() {
            "HH:MM"
        } else {
            report.time.as_str()
        };

        Self {
            year1: report.year1.clone(),
            year2: report.year2.clone(),
            department: report.department.clone(),
            iqac_doc_no: report.iqac_doc_no.clone(),
            title: report.activity_title.clone(),
            coordinator: report.coordinator_name.clone(),
            day_and_date: long_date(&report.date),
            venue: report.venue.clone(),
            time: format!("{} {}", time, report.time_period),
            participants: report.participants.clone(),
            nature: report.nature.label().to_string(),
            activity_type: report
                .effective_activity_type()
                .unwrap_or("N/A")
                .to_string(),
            schedule: report.schedule.label().to_string(),
            funding_source: report.funding_source.clone(),
            amount: report.amount.to_string(),
            chief_guest: report.chief_guest.clone(),
            topic: report.topic.clone(),
            objectives: report.objectives.clone(),
            methodology: report.methodology.clone(),
            outcomes: report.outcomes.clone(),
            documentation: report
                .documentation
                .numbered()
                .into_iter()
                .map(|(number, item)| NumberedItem {
                    number,
                    label: item.label(),
                })
                .collect(),
            footer_iqac_doc: report.footer_iqac_doc.clone(),
            attribute_name: report.attribute_name.clone(),
            dept_file_no: report.dept_file_no.clone(),
            iqac_file_no: report.iqac_file_no.clone(),
            signatures,
        }
    }

    /// "Year: 2024 - 2025". Two-digit entries get the century prefix the
    /// printed form carries.
    pub fn year_line(&self) -> String {
        format!(
            "Year: {} - {}",
            academic_year(&self.year1),
            academic_year(&self.year2)
        )
    }

    /// Label/value rows of the header block.
    pub fn header_rows(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("DEPARTMENT / COMMITTEE:", self.department.as_str()),
            ("IQAC Document No:", self.iqac_doc_no.as_str()),
            ("Title of Activity:", self.title.as_str()),
        ]
    }

    /// Label/value rows of the basic information grid.
    pub fn detail_rows(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Coordinator Name:", self.coordinator.as_str()),
            ("Day & Date:", self.day_and_date.as_str()),
            ("Venue:", self.venue.as_str()),
            ("Time:", self.time.as_str()),
            ("Participants:", self.participants.as_str()),
            ("Nature:", self.nature.as_str()),
            ("Type of Activity:", self.activity_type.as_str()),
            ("Schedule:", self.schedule.as_str()),
            ("Funding Source:", self.funding_source.as_str()),
            ("Amount:", self.amount.as_str()),
            ("Chief Guest Name:", self.chief_guest.as_str()),
        ]
    }

    /// Label/value rows of the ACTIVITY DETAILS section.
    pub fn narrative_rows(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Topic / Subject:", self.topic.as_str()),
            ("Objectives:", self.objectives.as_str()),
            ("Methodology:", self.methodology.as_str()),
            ("Outcomes:", self.outcomes.as_str()),
        ]
    }

    /// Label/value rows of the file-reference footer.
    pub fn footer_rows(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("IQAC Document No:", self.footer_iqac_doc.as_str()),
            ("Attribute Name & No:", self.attribute_name.as_str()),
            ("Departmental File No:", self.dept_file_no.as_str()),
            ("IQAC File No:", self.iqac_file_no.as_str()),
        ]
    }
}

impl fmt::Display for PreviewDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ACTIVITY REPORT")?;
        writeln!(f, "{}", self.year_line())?;
        writeln!(f)?;
        for (label, value) in self.header_rows().into_iter().chain(self.detail_rows()) {
            writeln!(f, "{label} {value}")?;
        }

        writeln!(f)?;
        writeln!(f, "ACTIVITY DETAILS")?;
        for (label, value) in self.narrative_rows() {
            writeln!(f, "{label}")?;
            for line in value.lines() {
                writeln!(f, "  {line}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "DOCUMENTATION")?;
        for item in &self.documentation {
            writeln!(f, "{}. {}", item.number, item.label)?;
        }

        writeln!(f)?;
        for (label, value) in self.footer_rows() {
            writeln!(f, "{label} {value}")?;
        }

        writeln!(f)?;
        for signature in &self.signatures {
            writeln!(
                f,
                "{}: {} {}",
                signature.role, signature.name, signature.date
            )?;
        }
        writeln!(f, "Remark:")
    }
}

fn parse_iso(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// "Sat, 14/09/2024"; "N/A" when empty; unparseable input is shown as typed.
fn long_date(date: &str) -> String {
    if date.trim().is_empty() {
        return "N/A".to_string();
    }
    match parse_iso(date) {
        Some(d) => d.format("%a, %d/%m/%Y").to_string(),
        None => date.to_string(),
    }
}

/// "14/09/2024"; empty stays empty.
fn short_date(date: &str) -> String {
    if date.trim().is_empty() {
        return String::new();
    }
    match parse_iso(date) {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => date.to_string(),
    }
}

fn academic_year(year: &str) -> String {
    let year = year.trim();
    if year.len() <= 2 {
        format!("20{year}")
    } else {
        year.to_string()
    }
}
