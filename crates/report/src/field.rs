//! Field-by-field edits of a report.
//!
//! Every user-editable field has a [`ReportField`] whose key is the stored
//! JSON name. `id`, `timestamp` and the documentation checklist are not
//! fields: the first two belong to the store, the checklist has its own API.

use crate::record::{ActivityReport, ActivityType, Nature, Schedule, TimePeriod};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("invalid value {value:?} for {field}: expected {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportField {
    Year1,
    Year2,
    Department,
    IqacDocNo,
    ActivityTitle,
    CoordinatorName,
    Date,
    Venue,
    Time,
    TimePeriod,
    Participants,
    Nature,
    ActivityType,
    CustomActivityType,
    Schedule,
    FundingSource,
    Amount,
    ChiefGuest,
    Topic,
    Objectives,
    Methodology,
    Outcomes,
    FooterIqacDoc,
    AttributeName,
    DeptFileNo,
    IqacFileNo,
    TeacherName,
    TeacherDate,
    HeadName,
    HeadDate,
    IqacCoordinator,
    IqacDate,
    IcPrincipalName,
    IcPrincipalDate,
}

impl ReportField {
    /// Fields in form order.
    pub const ALL: [ReportField; 34] = [
        ReportField::Year1,
        ReportField::Year2,
        ReportField::Department,
        ReportField::IqacDocNo,
        ReportField::ActivityTitle,
        ReportField::CoordinatorName,
        ReportField::Date,
        ReportField::Venue,
        ReportField::Time,
        ReportField::TimePeriod,
        ReportField::Participants,
        ReportField::Nature,
        ReportField::ActivityType,
        ReportField::CustomActivityType,
        ReportField::Schedule,
        ReportField::FundingSource,
        ReportField::Amount,
        ReportField::ChiefGuest,
        ReportField::Topic,
        ReportField::Objectives,
        ReportField::Methodology,
        ReportField::Outcomes,
        ReportField::FooterIqacDoc,
        ReportField::AttributeName,
        ReportField::DeptFileNo,
        ReportField::IqacFileNo,
        ReportField::TeacherName,
        ReportField::TeacherDate,
        ReportField::HeadName,
        ReportField::HeadDate,
        ReportField::IqacCoordinator,
        ReportField::IqacDate,
        ReportField::IcPrincipalName,
        ReportField::IcPrincipalDate,
    ];

    /// The stored JSON name of the field.
    pub fn key(&self) -> &'static str {
        match self {
            ReportField::Year1 => "year1",
            ReportField::Year2 => "year2",
            ReportField::Department => "department",
            ReportField::IqacDocNo => "iqacDocNo",
            ReportField::ActivityTitle => "activityTitle",
            ReportField::CoordinatorName => "coordinatorName",
            ReportField::Date => "date",
            ReportField::Venue => "venue",
            ReportField::Time => "time",
            ReportField::TimePeriod => "timePeriod",
            ReportField::Participants => "participants",
            ReportField::Nature => "nature",
            ReportField::ActivityType => "activityType",
            ReportField::CustomActivityType => "customActivityType",
            ReportField::Schedule => "schedule",
            ReportField::FundingSource => "fundingSource",
            ReportField::Amount => "amount",
            ReportField::ChiefGuest => "chiefGuest",
            ReportField::Topic => "topic",
            ReportField::Objectives => "objectives",
            ReportField::Methodology => "methodology",
            ReportField::Outcomes => "outcomes",
            ReportField::FooterIqacDoc => "footerIqacDoc",
            ReportField::AttributeName => "attributeName",
            ReportField::DeptFileNo => "deptFileNo",
            ReportField::IqacFileNo => "iqacFileNo",
            ReportField::TeacherName => "teacherName",
            ReportField::TeacherDate => "teacherDate",
            ReportField::HeadName => "headName",
            ReportField::HeadDate => "headDate",
            ReportField::IqacCoordinator => "iqacCoordinator",
            ReportField::IqacDate => "iqacDate",
            ReportField::IcPrincipalName => "icPrincipalName",
            ReportField::IcPrincipalDate => "icPrincipalDate",
        }
    }

    /// Short hint of accepted values, for help output.
    pub fn hint(&self) -> &'static str {
        match self {
            ReportField::Date
            | ReportField::TeacherDate
            | ReportField::HeadDate
            | ReportField::IqacDate
            | ReportField::IcPrincipalDate => "YYYY-MM-DD",
            ReportField::Time => "HH:MM",
            ReportField::TimePeriod => "AM | PM",
            ReportField::Nature => "Outdoor | Indoor | Online",
            ReportField::ActivityType => concat!(
                "Academic | Extension | Student Progression | Student Support | ",
                "Environment | Gender | Days | Enrichment | Other(Specify)"
            ),
            ReportField::Schedule => "Scheduled | Unscheduled",
            ReportField::Amount => "digits only",
            ReportField::Participants => "count, digits only",
            _ => "text",
        }
    }

    fn text_slot<'a>(&self, report: &'a mut ActivityReport) -> Option<&'a mut String> {
        let slot = match self {
            ReportField::Year1 => &mut report.year1,
            ReportField::Year2 => &mut report.year2,
            ReportField::Department => &mut report.department,
            ReportField::IqacDocNo => &mut report.iqac_doc_no,
            ReportField::ActivityTitle => &mut report.activity_title,
            ReportField::CoordinatorName => &mut report.coordinator_name,
            ReportField::Date => &mut report.date,
            ReportField::Venue => &mut report.venue,
            ReportField::Time => &mut report.time,
            ReportField::Participants => &mut report.participants,
            ReportField::CustomActivityType => &mut report.custom_activity_type,
            ReportField::FundingSource => &mut report.funding_source,
            ReportField::ChiefGuest => &mut report.chief_guest,
            ReportField::Topic => &mut report.topic,
            ReportField::Objectives => &mut report.objectives,
            ReportField::Methodology => &mut report.methodology,
            ReportField::Outcomes => &mut report.outcomes,
            ReportField::FooterIqacDoc => &mut report.footer_iqac_doc,
            ReportField::AttributeName => &mut report.attribute_name,
            ReportField::DeptFileNo => &mut report.dept_file_no,
            ReportField::IqacFileNo => &mut report.iqac_file_no,
            ReportField::TeacherName => &mut report.teacher_name,
            ReportField::TeacherDate => &mut report.teacher_date,
            ReportField::HeadName => &mut report.head_name,
            ReportField::HeadDate => &mut report.head_date,
            ReportField::IqacCoordinator => &mut report.iqac_coordinator,
            ReportField::IqacDate => &mut report.iqac_date,
            ReportField::IcPrincipalName => &mut report.ic_principal_name,
            ReportField::IcPrincipalDate => &mut report.ic_principal_date,
            ReportField::TimePeriod
            | ReportField::Nature
            | ReportField::ActivityType
            | ReportField::Schedule
            | ReportField::Amount => return None,
        };
        Some(slot)
    }

    fn invalid(&self, value: &str) -> FieldError {
        FieldError::InvalidValue {
            field: self.key(),
            value: value.to_string(),
            expected: self.hint().to_string(),
        }
    }
}

impl FromStr for ReportField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FieldError::UnknownField(wanted.to_string()))
    }
}

impl std::fmt::Display for ReportField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl ActivityReport {
    /// Set one field from user input.
    ///
    /// Enumerated fields take their labels (empty clears them). `amount`
    /// and `participants` accept digits only; any other input is rejected
    /// and leaves the previous value in place.
    pub fn apply(&mut self, field: ReportField, value: &str) -> Result<(), FieldError> {
        match field {
            ReportField::TimePeriod => {
                self.time_period =
                    TimePeriod::from_label(value).ok_or_else(|| field.invalid(value))?;
            }
            ReportField::Nature => {
                self.nature = Nature::from_label(value).ok_or_else(|| field.invalid(value))?;
            }
            ReportField::ActivityType => {
                self.activity_type =
                    ActivityType::from_label(value).ok_or_else(|| field.invalid(value))?;
            }
            ReportField::Schedule => {
                self.schedule = Schedule::from_label(value).ok_or_else(|| field.invalid(value))?;
            }
            ReportField::Amount => {
                self.amount = parse_amount(value).ok_or_else(|| field.invalid(value))?;
            }
            ReportField::Participants => {
                if !is_count(value) {
                    return Err(field.invalid(value));
                }
                self.participants = value.to_string();
            }
            text => {
                if let Some(slot) = text.text_slot(self) {
                    *slot = value.to_string();
                }
            }
        }
        Ok(())
    }

    /// Current value of a field as it would appear in an input widget.
    pub fn value_of(&self, field: ReportField) -> String {
        match field {
            ReportField::TimePeriod => self.time_period.label().to_string(),
            ReportField::Nature => self.nature.label().to_string(),
            ReportField::ActivityType => self.activity_type.label().to_string(),
            ReportField::Schedule => self.schedule.label().to_string(),
            ReportField::Amount => self.amount.to_string(),
            ReportField::Year1 => self.year1.clone(),
            ReportField::Year2 => self.year2.clone(),
            ReportField::Department => self.department.clone(),
            ReportField::IqacDocNo => self.iqac_doc_no.clone(),
            ReportField::ActivityTitle => self.activity_title.clone(),
            ReportField::CoordinatorName => self.coordinator_name.clone(),
            ReportField::Date => self.date.clone(),
            ReportField::Venue => self.venue.clone(),
            ReportField::Time => self.time.clone(),
            ReportField::Participants => self.participants.clone(),
            ReportField::CustomActivityType => self.custom_activity_type.clone(),
            ReportField::FundingSource => self.funding_source.clone(),
            ReportField::ChiefGuest => self.chief_guest.clone(),
            ReportField::Topic => self.topic.clone(),
            ReportField::Objectives => self.objectives.clone(),
            ReportField::Methodology => self.methodology.clone(),
            ReportField::Outcomes => self.outcomes.clone(),
            ReportField::FooterIqacDoc => self.footer_iqac_doc.clone(),
            ReportField::AttributeName => self.attribute_name.clone(),
            ReportField::DeptFileNo => self.dept_file_no.clone(),
            ReportField::IqacFileNo => self.iqac_file_no.clone(),
            ReportField::TeacherName => self.teacher_name.clone(),
            ReportField::TeacherDate => self.teacher_date.clone(),
            ReportField::HeadName => self.head_name.clone(),
            ReportField::HeadDate => self.head_date.clone(),
            ReportField::IqacCoordinator => self.iqac_coordinator.clone(),
            ReportField::IqacDate => self.iqac_date.clone(),
            ReportField::IcPrincipalName => self.ic_principal_name.clone(),
            ReportField::IcPrincipalDate => self.ic_principal_date.clone(),
        }
    }
}

/// Digits only; the empty string is zero.
fn parse_amount(value: &str) -> Option<u64> {
    if value.is_empty() {
        return Some(0);
    }
    if !is_count(value) {
        return None;
    }
    value.parse().ok()
}

/// Empty, or ASCII digits only.
fn is_count(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_edit() {
        let mut report = ActivityReport::new();
        report.apply(ReportField::Venue, "Seminar Hall").unwrap();
        report.apply(ReportField::IcPrincipalName, "Dr. Rao").unwrap();
        assert_eq!(report.venue, "Seminar Hall");
        assert_eq!(report.ic_principal_name, "Dr. Rao");
        assert_eq!(report.value_of(ReportField::Venue), "Seminar Hall");
    }

    #[test]
    fn test_amount_accepts_digits_only() {
        let mut report = ActivityReport::new();
        report.apply(ReportField::Amount, "2500").unwrap();
        assert_eq!(report.amount, 2500);

        let err = report.apply(ReportField::Amount, "25.00").unwrap_err();
        assert!(matches!(err, FieldError::InvalidValue { field: "amount", .. }));
        assert_eq!(report.amount, 2500, "rejected input keeps previous value");

        assert!(report.apply(ReportField::Amount, "-3").is_err());
        report.apply(ReportField::Amount, "").unwrap();
        assert_eq!(report.amount, 0);
    }

    #[test]
    fn test_participants_accepts_digits_only() {
        let mut report = ActivityReport::new();
        report.apply(ReportField::Participants, "120").unwrap();
        assert_eq!(report.participants, "120");

        let err = report.apply(ReportField::Participants, "many").unwrap_err();
        assert!(matches!(
            err,
            FieldError::InvalidValue { field: "participants", .. }
        ));
        assert_eq!(report.participants, "120");

        report.apply(ReportField::Participants, "").unwrap();
        assert_eq!(report.participants, "");
    }

    #[test]
    fn test_enum_fields_parse_labels() {
        let mut report = ActivityReport::new();
        report.apply(ReportField::Nature, "Online").unwrap();
        report.apply(ReportField::Schedule, "Unscheduled").unwrap();
        report.apply(ReportField::TimePeriod, "PM").unwrap();
        report.apply(ReportField::ActivityType, "Other(Specify)").unwrap();

        assert_eq!(report.nature, Nature::Online);
        assert_eq!(report.schedule, Schedule::Unscheduled);
        assert_eq!(report.time_period, TimePeriod::Pm);
        assert_eq!(report.activity_type, ActivityType::Other);

        assert!(report.apply(ReportField::Nature, "Hybrid").is_err());
        assert_eq!(report.nature, Nature::Online);

        report.apply(ReportField::Nature, "").unwrap();
        assert_eq!(report.nature, Nature::Unset);
    }

    #[test]
    fn test_field_keys_parse() {
        assert_eq!("iqacDocNo".parse::<ReportField>(), Ok(ReportField::IqacDocNo));
        assert_eq!("ACTIVITYTITLE".parse::<ReportField>(), Ok(ReportField::ActivityTitle));
        assert_eq!(
            "id".parse::<ReportField>(),
            Err(FieldError::UnknownField("id".to_string()))
        );
    }

    #[test]
    fn test_every_field_key_matches_serialized_name() {
        let json = serde_json::to_value(ActivityReport::new()).unwrap();
        for field in ReportField::ALL {
            assert!(
                json.get(field.key()).is_some(),
                "{} missing from serialized record",
                field.key()
            );
        }
    }
}
